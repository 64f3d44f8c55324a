//! CLI Commands
//!
//! Each command is a plain function over a [`LedgerGateway`](crate::gateway::LedgerGateway)
//! returning a printable outcome, so the binary and the tests share one path.

mod batch;
mod proof;
mod roles;

pub use batch::{
    batch_info, deactivate_batch, log_anomaly, parse_date, register_batch, transfer_batch,
    AnomalyOutcome, BatchReport, PLACEHOLDER_DRUG_NAME,
};
pub use proof::{generate_proof, setup, submit_proof, verify_commitment, SubmitOutcome};
pub use roles::{grant_role, revoke_role};
