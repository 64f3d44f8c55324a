//! Drug batch state and its transitions.
//!
//! Every transition is a pure function from the current state and a command to
//! the next state plus the record it produces. The contract loads state,
//! applies a transition and writes only when it returns `Ok`.

use common::{TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{contracttype, Address, BytesN, Env, String, Vec};

use crate::RegistryError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum BatchKey {
    Batch(BytesN<32>),
    Transfers(BytesN<32>),
    /// Number of registered batches.
    Count,
    /// Registration order index. One entry per batch keeps every write
    /// constant-size.
    IdAt(u32),
}

/// A manufactured drug batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DrugBatch {
    pub batch_id: BytesN<32>,
    pub manufacturer: Address,
    pub drug_name: String,
    pub manufacturing_date: u64,
    pub expiry_date: u64,
    pub is_active: bool,
    pub current_owner: Address,
}

impl DrugBatch {
    /// Dates are recorded as submitted; this flags batches whose expiry does
    /// not follow manufacture.
    pub fn has_valid_shelf_life(&self) -> bool {
        self.expiry_date > self.manufacturing_date
    }
}

/// One completed custody hand-off.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferRecord {
    pub batch_id: BytesN<32>,
    pub from: Address,
    pub to: Address,
    pub timestamp: u64,
    pub location: String,
}

/// Input to [`register`].
pub struct NewBatch {
    pub batch_id: BytesN<32>,
    pub manufacturer: Address,
    pub drug_name: String,
    pub manufacturing_date: u64,
    pub expiry_date: u64,
}

/// `Unregistered -> Active`.
pub fn register(existing: Option<&DrugBatch>, cmd: NewBatch) -> Result<DrugBatch, RegistryError> {
    if cmd.drug_name.len() == 0 {
        return Err(RegistryError::InvalidInput);
    }
    if existing.is_some() {
        return Err(RegistryError::BatchAlreadyExists);
    }

    Ok(DrugBatch {
        batch_id: cmd.batch_id,
        current_owner: cmd.manufacturer.clone(),
        manufacturer: cmd.manufacturer,
        drug_name: cmd.drug_name,
        manufacturing_date: cmd.manufacturing_date,
        expiry_date: cmd.expiry_date,
        is_active: true,
    })
}

/// `Active -> Active` with a new owner.
pub fn transfer(
    state: Option<DrugBatch>,
    caller: &Address,
    to: Address,
    location: String,
    timestamp: u64,
) -> Result<(DrugBatch, TransferRecord), RegistryError> {
    let mut batch = state.ok_or(RegistryError::BatchNotFound)?;
    if !batch.is_active {
        return Err(RegistryError::BatchInactive);
    }
    if &batch.current_owner != caller {
        return Err(RegistryError::NotOwner);
    }

    let record = TransferRecord {
        batch_id: batch.batch_id.clone(),
        from: batch.current_owner.clone(),
        to: to.clone(),
        timestamp,
        location,
    };
    batch.current_owner = to;
    Ok((batch, record))
}

/// `Active -> Inactive`. There is no way back.
pub fn deactivate(state: Option<DrugBatch>) -> Result<DrugBatch, RegistryError> {
    let mut batch = state.ok_or(RegistryError::BatchNotFound)?;
    if !batch.is_active {
        return Err(RegistryError::BatchInactive);
    }
    batch.is_active = false;
    Ok(batch)
}

// ── Storage ──────────────────────────────────────────────────────────────────

fn bump(env: &Env, key: &BatchKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, batch_id: &BytesN<32>) -> Option<DrugBatch> {
    env.storage()
        .persistent()
        .get(&BatchKey::Batch(batch_id.clone()))
}

pub(crate) fn exists(env: &Env, batch_id: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&BatchKey::Batch(batch_id.clone()))
}

pub(crate) fn save(env: &Env, batch: &DrugBatch) {
    let key = BatchKey::Batch(batch.batch_id.clone());
    env.storage().persistent().set(&key, batch);
    bump(env, &key);
}

pub(crate) fn count(env: &Env) -> u32 {
    env.storage()
        .persistent()
        .get(&BatchKey::Count)
        .unwrap_or(0)
}

/// Ids in registration order, `start` onwards, at most `limit` of them.
pub(crate) fn ids(env: &Env, start: u32, limit: u32) -> Vec<BytesN<32>> {
    let end = count(env).min(start.saturating_add(limit));
    let mut out = Vec::new(env);
    for i in start..end {
        if let Some(id) = env.storage().persistent().get(&BatchKey::IdAt(i)) {
            out.push_back(id);
        }
    }
    out
}

pub(crate) fn push_id(env: &Env, batch_id: &BytesN<32>) {
    let index = count(env);
    let slot = BatchKey::IdAt(index);
    env.storage().persistent().set(&slot, batch_id);
    bump(env, &slot);
    env.storage().persistent().set(&BatchKey::Count, &(index + 1));
    bump(env, &BatchKey::Count);
}

pub(crate) fn transfers(env: &Env, batch_id: &BytesN<32>) -> Vec<TransferRecord> {
    env.storage()
        .persistent()
        .get(&BatchKey::Transfers(batch_id.clone()))
        .unwrap_or(Vec::new(env))
}

pub(crate) fn push_transfer(env: &Env, record: &TransferRecord) {
    let key = BatchKey::Transfers(record.batch_id.clone());
    let mut history = transfers(env, &record.batch_id);
    history.push_back(record.clone());
    env.storage().persistent().set(&key, &history);
    bump(env, &key);
}
