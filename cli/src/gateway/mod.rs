//! Access to the deployed contracts.
//!
//! Commands talk to [`LedgerGateway`] only. [`stellar::StellarCli`] drives
//! the `stellar` command-line client; tests substitute an in-process
//! implementation.

pub mod stellar;

use std::fmt;
use std::path::PathBuf;

use common::Role;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zk_prover::encode::ProofArg;

use crate::batch_id::BatchId;

/// Which contract of the suite a call targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contract {
    AccessControl,
    Verifier,
    Ledger,
    Registry,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Contract::AccessControl => "access control",
            Contract::Verifier => "verifier",
            Contract::Ledger => "ledger",
            Contract::Registry => "registry",
        })
    }
}

/// A contract error code translated into its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractErrorKind {
    NotInitialized,
    AlreadyInitialized,
    Unauthorized,
    MalformedInput,
    ProofInvalid,
    DuplicateCommitment,
    BatchNotFound,
    BatchAlreadyExists,
    BatchInactive,
    NotOwner,
    InvalidInput,
    InvalidVerificationKey,
    Unknown(u32),
}

impl ContractErrorKind {
    /// Map `Error(Contract, #code)` to a name using the enum of `contract`.
    /// Codes 1-3 are shared by every contract.
    pub fn from_code(contract: Contract, code: u32) -> Self {
        use ContractErrorKind::*;
        match (contract, code) {
            (_, 1) => NotInitialized,
            (_, 2) => AlreadyInitialized,
            (_, 3) => Unauthorized,
            (Contract::Ledger, 4) => MalformedInput,
            (Contract::Ledger, 5) => ProofInvalid,
            (Contract::Ledger, 6) => DuplicateCommitment,
            (Contract::Registry, 4) => BatchNotFound,
            (Contract::Registry, 5) => BatchAlreadyExists,
            (Contract::Registry, 6) => BatchInactive,
            (Contract::Registry, 7) => NotOwner,
            (Contract::Registry, 8) => InvalidInput,
            (Contract::Verifier, 4) => InvalidVerificationKey,
            (_, other) => Unknown(other),
        }
    }
}

impl fmt::Display for ContractErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractErrorKind::Unknown(code) => write!(f, "error code {code}"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{contract} contract rejected the call: {kind}")]
    Contract {
        contract: Contract,
        kind: ContractErrorKind,
    },

    #[error("could not reach the network: {0}")]
    Connectivity(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    pub fn contract_kind(&self) -> Option<ContractErrorKind> {
        match self {
            GatewayError::Contract { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Whether a state-changing call is only simulated or actually sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvokeMode {
    Simulate,
    Send,
}

/// Outcome of a sent (or simulated) transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: Option<String>,
}

/// `DrugBatch` as returned by `get_batch_info`; ids are hex, addresses strkeys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInfo {
    pub batch_id: String,
    pub drug_name: String,
    pub manufacturer: String,
    pub manufacturing_date: u64,
    pub expiry_date: u64,
    pub is_active: bool,
    pub current_owner: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInfo {
    pub from: String,
    pub to: String,
    pub timestamp: u64,
    pub location: String,
}

/// Every contract call the CLI makes.
///
/// State-changing calls are signed by [`LedgerGateway::caller`] and pass it as
/// the `caller` argument.
pub trait LedgerGateway {
    /// Address of the signing identity.
    fn caller(&self) -> Result<String>;

    fn has_role(&self, role: Role, account: &str) -> Result<bool>;
    fn grant_role(&self, role: Role, account: &str) -> Result<Receipt>;
    fn revoke_role(&self, role: Role, account: &str) -> Result<Receipt>;

    /// `signals` are 64-char hex words.
    fn submit_commitment(
        &self,
        proof: &ProofArg,
        signals: &[String],
        mode: InvokeMode,
    ) -> Result<Receipt>;
    fn verify_commitment(&self, commitment: &[u8; 32]) -> Result<bool>;

    fn batch_exists(&self, batch: &BatchId) -> Result<bool>;
    fn batch_info(&self, batch: &BatchId) -> Result<BatchInfo>;
    fn transfer_history(&self, batch: &BatchId) -> Result<Vec<TransferInfo>>;
    fn register_batch(
        &self,
        batch: &BatchId,
        drug_name: &str,
        manufacturing_date: u64,
        expiry_date: u64,
    ) -> Result<Receipt>;
    fn transfer_batch(&self, batch: &BatchId, to: &str, location: &str) -> Result<Receipt>;
    fn deactivate_batch(&self, batch: &BatchId) -> Result<Receipt>;
    fn log_anomaly_check(
        &self,
        batch: &BatchId,
        prediction_hash: &[u8; 32],
        anomaly_type: &str,
    ) -> Result<Receipt>;
}
