//! Shared types and contract interfaces for the MedTrace contract suite.
//!
//! This crate provides:
//! - [`Role`] — the flat role set consulted by every role-gated entry point.
//! - [`Proof`], [`G1Point`], [`G2Point`] — the Groth16 proof layout shared by the
//!   verifier contracts, the commitment ledger and the off-chain prover.
//! - [`VerifierClient`] and [`AccessControlClient`] — narrow cross-contract
//!   interfaces so contracts never link each other directly.
//! - BN254 scalar-field helpers in [`field`].

#![cfg_attr(not(feature = "std"), no_std)]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod field;
pub mod interfaces;
pub mod proof;
pub mod roles;

pub use field::{is_canonical_scalar, BN254_SCALAR_MODULUS};
pub use interfaces::{AccessControlClient, VerifierClient};
pub use proof::{G1Point, G2Point, Proof, ProofValidationError};
pub use roles::{Role, UnknownRole};

/// Ledger threshold below which persistent entries get their TTL bumped.
pub const TTL_THRESHOLD: u32 = 5184000;
/// Ledger count persistent entries are extended to.
pub const TTL_EXTEND_TO: u32 = 10368000;
