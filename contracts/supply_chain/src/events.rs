use soroban_sdk::{symbol_short, Address, BytesN, Env, String};

use crate::{AnomalyLogEntry, TransferRecord};

/// Event published when the registry is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub access_control: Address,
    pub timestamp: u64,
}

/// Event published when a batch is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchRegisteredEvent {
    pub batch_id: BytesN<32>,
    pub manufacturer: Address,
    pub drug_name: String,
    pub timestamp: u64,
}

/// Event published when a batch is deactivated.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchDeactivatedEvent {
    pub batch_id: BytesN<32>,
    pub admin: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address, access_control: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        access_control,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_batch_registered(
    env: &Env,
    batch_id: BytesN<32>,
    manufacturer: Address,
    drug_name: String,
) {
    let topics = (symbol_short!("BATCH_REG"), batch_id.clone());
    let data = BatchRegisteredEvent {
        batch_id,
        manufacturer,
        drug_name,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_batch_transferred(env: &Env, record: &TransferRecord) {
    let topics = (symbol_short!("BATCH_TRF"), record.batch_id.clone());
    env.events().publish(topics, record.clone());
}

pub fn publish_batch_deactivated(env: &Env, batch_id: BytesN<32>, admin: Address) {
    let topics = (symbol_short!("BATCH_OFF"), batch_id.clone());
    let data = BatchDeactivatedEvent {
        batch_id,
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_anomaly_logged(env: &Env, entry: &AnomalyLogEntry) {
    let topics = (symbol_short!("ANOMALY"), entry.batch_id.clone());
    env.events().publish(topics, entry.clone());
}
