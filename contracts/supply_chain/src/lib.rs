#![no_std]

//! Pharmaceutical batch provenance registry.
//!
//! Batches move `Unregistered -> Active -> {Active, Inactive}`. Manufacturers
//! register, current owners hand custody on, admins deactivate. ML loggers
//! attach anomaly findings to any registered batch. Roles come from the
//! access-control contract configured at initialization.

pub mod anomaly;
pub mod batch;
pub mod events;


pub use anomaly::AnomalyLogEntry;
pub use batch::{DrugBatch, TransferRecord};

use common::{AccessControlClient, Role, TTL_EXTEND_TO, TTL_THRESHOLD};
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, BytesN, Env, String, Symbol,
    Vec,
};

const ADMIN: Symbol = symbol_short!("ADMIN");
const ACCESS: Symbol = symbol_short!("ACCESS");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    BatchNotFound = 4,
    BatchAlreadyExists = 5,
    BatchInactive = 6,
    NotOwner = 7,
    InvalidInput = 8,
}

fn access_control(env: &Env) -> Result<AccessControlClient<'_>, RegistryError> {
    let address: Address = env
        .storage()
        .instance()
        .get(&ACCESS)
        .ok_or(RegistryError::NotInitialized)?;
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(AccessControlClient::new(env, &address))
}

/// Authenticate `caller` and require it to hold `role`.
fn require_role(env: &Env, caller: &Address, role: Role) -> Result<(), RegistryError> {
    let roles = access_control(env)?;
    caller.require_auth();
    if !roles.has_role(&role, caller) {
        return Err(RegistryError::Unauthorized);
    }
    Ok(())
}

#[contract]
pub struct SupplyChainContract;

#[contractimpl]
impl SupplyChainContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        access_control: Address,
    ) -> Result<(), RegistryError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(RegistryError::AlreadyInitialized);
        }
        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&ACCESS, &access_control);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_initialized(&env, admin, access_control);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, RegistryError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(RegistryError::NotInitialized)
    }

    pub fn get_access_control(env: Env) -> Result<Address, RegistryError> {
        env.storage()
            .instance()
            .get(&ACCESS)
            .ok_or(RegistryError::NotInitialized)
    }

    /// Register a new batch owned by the calling manufacturer.
    pub fn register_batch(
        env: Env,
        caller: Address,
        batch_id: BytesN<32>,
        drug_name: String,
        manufacturing_date: u64,
        expiry_date: u64,
    ) -> Result<DrugBatch, RegistryError> {
        require_role(&env, &caller, Role::Manufacturer)?;

        let existing = batch::load(&env, &batch_id);
        let created = batch::register(
            existing.as_ref(),
            batch::NewBatch {
                batch_id: batch_id.clone(),
                manufacturer: caller.clone(),
                drug_name: drug_name.clone(),
                manufacturing_date,
                expiry_date,
            },
        )?;

        batch::save(&env, &created);
        batch::push_id(&env, &batch_id);

        events::publish_batch_registered(&env, batch_id, caller, drug_name);
        Ok(created)
    }

    /// Hand a batch to `to`. Only the current owner may transfer, and only
    /// while the batch is active.
    pub fn transfer_batch(
        env: Env,
        caller: Address,
        batch_id: BytesN<32>,
        to: Address,
        location: String,
    ) -> Result<TransferRecord, RegistryError> {
        access_control(&env)?;
        caller.require_auth();

        let state = batch::load(&env, &batch_id);
        let (next, record) =
            batch::transfer(state, &caller, to, location, env.ledger().timestamp())?;

        batch::save(&env, &next);
        batch::push_transfer(&env, &record);

        events::publish_batch_transferred(&env, &record);
        Ok(record)
    }

    /// Permanently retire a batch (admin only).
    pub fn deactivate_batch(
        env: Env,
        caller: Address,
        batch_id: BytesN<32>,
    ) -> Result<(), RegistryError> {
        require_role(&env, &caller, Role::Admin)?;

        let next = batch::deactivate(batch::load(&env, &batch_id))?;
        batch::save(&env, &next);

        events::publish_batch_deactivated(&env, batch_id, caller);
        Ok(())
    }

    /// Attach an anomaly finding to a registered batch (ML logger only).
    pub fn log_anomaly_check(
        env: Env,
        caller: Address,
        batch_id: BytesN<32>,
        prediction_hash: BytesN<32>,
        anomaly_type: String,
    ) -> Result<AnomalyLogEntry, RegistryError> {
        require_role(&env, &caller, Role::MlLogger)?;

        let entry = anomaly::new_entry(
            batch::exists(&env, &batch_id),
            batch_id,
            prediction_hash,
            caller,
            anomaly_type,
            env.ledger().timestamp(),
        )?;
        anomaly::append(&env, &entry);

        events::publish_anomaly_logged(&env, &entry);
        Ok(entry)
    }

    /// Every registered id in registration order. Large registries should
    /// page with [`Self::get_batch_ids`].
    pub fn get_all_batch_ids(env: Env) -> Vec<BytesN<32>> {
        batch::ids(&env, 0, u32::MAX)
    }

    /// Up to `limit` ids in registration order, starting at index `start`.
    pub fn get_batch_ids(env: Env, start: u32, limit: u32) -> Vec<BytesN<32>> {
        batch::ids(&env, start, limit)
    }

    pub fn get_batch_count(env: Env) -> u32 {
        batch::count(&env)
    }

    pub fn get_batch_info(env: Env, batch_id: BytesN<32>) -> Result<DrugBatch, RegistryError> {
        batch::load(&env, &batch_id).ok_or(RegistryError::BatchNotFound)
    }

    pub fn batch_exists(env: Env, batch_id: BytesN<32>) -> bool {
        batch::exists(&env, &batch_id)
    }

    /// Custody hand-offs for a batch, oldest first.
    pub fn get_transfer_history(env: Env, batch_id: BytesN<32>) -> Vec<TransferRecord> {
        batch::transfers(&env, &batch_id)
    }

    /// Anomaly findings for a batch, oldest first.
    pub fn get_anomaly_logs(env: Env, batch_id: BytesN<32>) -> Vec<AnomalyLogEntry> {
        anomaly::logs(&env, &batch_id)
    }

    pub fn get_anomaly_count(env: Env, batch_id: BytesN<32>) -> u32 {
        anomaly::logs(&env, &batch_id).len()
    }
}
