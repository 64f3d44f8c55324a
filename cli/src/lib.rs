//! MedTrace command-line client.
//!
//! Drives the off-chain prover and the deployed contracts: commitment proofs
//! for medical records, batch provenance and anomaly logs, and role
//! administration.

pub mod batch_id;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod logging;

pub use batch_id::BatchId;
pub use gateway::{ContractErrorKind, GatewayError, LedgerGateway};
