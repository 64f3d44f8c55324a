use common::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, Address, BytesN, Env, String, Vec};

use crate::RegistryError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum AnomalyKey {
    Logs(BytesN<32>),
}

/// Result of one off-chain anomaly check against a batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnomalyLogEntry {
    pub batch_id: BytesN<32>,
    pub prediction_hash: BytesN<32>,
    pub logger: Address,
    pub timestamp: u64,
    pub anomaly_type: String,
}

/// Build the entry for a check. Batch state is never consulted beyond
/// existence, so inactive batches still accept findings.
pub fn new_entry(
    batch_exists: bool,
    batch_id: BytesN<32>,
    prediction_hash: BytesN<32>,
    logger: Address,
    anomaly_type: String,
    timestamp: u64,
) -> Result<AnomalyLogEntry, RegistryError> {
    if anomaly_type.len() == 0 {
        return Err(RegistryError::InvalidInput);
    }
    if !batch_exists {
        return Err(RegistryError::BatchNotFound);
    }
    Ok(AnomalyLogEntry {
        batch_id,
        prediction_hash,
        logger,
        timestamp,
        anomaly_type,
    })
}

pub(crate) fn logs(env: &Env, batch_id: &BytesN<32>) -> Vec<AnomalyLogEntry> {
    env.storage()
        .persistent()
        .get(&AnomalyKey::Logs(batch_id.clone()))
        .unwrap_or(Vec::new(env))
}

pub(crate) fn append(env: &Env, entry: &AnomalyLogEntry) {
    let key = AnomalyKey::Logs(entry.batch_id.clone());
    let mut all = logs(env, &entry.batch_id);
    all.push_back(entry.clone());
    env.storage().persistent().set(&key, &all);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
