#![no_std]

//! Append-only ledger of zero-knowledge medical-record commitments.
//!
//! A healthcare provider submits a Groth16 proof whose single public signal is
//! the commitment. The ledger checks the submitter's role with the
//! access-control contract, asks the configured verifier to check the proof,
//! and records the commitment once. A commitment accepted from any submitter
//! can never be recorded again.

pub mod events;


use common::{
    is_canonical_scalar, AccessControlClient, Proof, Role, VerifierClient, TTL_EXTEND_TO,
    TTL_THRESHOLD,
};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, BytesN, Env,
    Symbol, Vec,
};

const ADMIN: Symbol = symbol_short!("ADMIN");
const ACCESS: Symbol = symbol_short!("ACCESS");
const VERIFIER: Symbol = symbol_short!("VERIFIER");
const TOTAL: Symbol = symbol_short!("TOTAL");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum DataKey {
    /// Records submitted by one identity, in insertion order.
    Records(Address),
    /// Global uniqueness marker: commitment -> submitter.
    Owner(BytesN<32>),
}

/// One accepted commitment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitmentRecord {
    pub submitter: Address,
    pub commitment: BytesN<32>,
    pub timestamp: u64,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LedgerError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    MalformedInput = 4,
    ProofInvalid = 5,
    DuplicateCommitment = 6,
}

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn load_address(env: &Env, key: &Symbol) -> Result<Address, LedgerError> {
    env.storage()
        .instance()
        .get(key)
        .ok_or(LedgerError::NotInitialized)
}

fn records_of(env: &Env, identity: &Address) -> Vec<CommitmentRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Records(identity.clone()))
        .unwrap_or(Vec::new(env))
}

#[contract]
pub struct CommitmentLedgerContract;

#[contractimpl]
impl CommitmentLedgerContract {
    /// Wire the ledger to its access-control registry and verifier.
    pub fn initialize(
        env: Env,
        admin: Address,
        access_control: Address,
        verifier: Address,
    ) -> Result<(), LedgerError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(LedgerError::AlreadyInitialized);
        }
        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&ACCESS, &access_control);
        env.storage().instance().set(&VERIFIER, &verifier);
        env.storage().instance().set(&TOTAL, &0u64);
        extend_instance(&env);

        events::publish_initialized(&env, admin, access_control, verifier);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, LedgerError> {
        load_address(&env, &ADMIN)
    }

    pub fn get_verifier(env: Env) -> Result<Address, LedgerError> {
        load_address(&env, &VERIFIER)
    }

    pub fn get_access_control(env: Env) -> Result<Address, LedgerError> {
        load_address(&env, &ACCESS)
    }

    /// Record a commitment backed by a valid proof.
    ///
    /// Checks run in a fixed order and nothing is written until all pass:
    /// role, input shape, proof, then global uniqueness.
    pub fn submit_commitment(
        env: Env,
        caller: Address,
        proof: Proof,
        public_signals: Vec<BytesN<32>>,
    ) -> Result<CommitmentRecord, LedgerError> {
        let access = load_address(&env, &ACCESS)?;
        let verifier = load_address(&env, &VERIFIER)?;
        caller.require_auth();

        if !AccessControlClient::new(&env, &access).has_role(&Role::HealthcareProvider, &caller) {
            return Err(LedgerError::Unauthorized);
        }

        if public_signals.len() != 1 {
            return Err(LedgerError::MalformedInput);
        }
        let commitment = public_signals
            .get(0)
            .ok_or(LedgerError::MalformedInput)?;
        if !is_canonical_scalar(&commitment.to_array()) {
            return Err(LedgerError::MalformedInput);
        }

        // A verifier that traps or returns garbage counts as a rejection.
        let verified = matches!(
            VerifierClient::new(&env, &verifier).try_verify_proof(&proof, &public_signals),
            Ok(Ok(true))
        );
        if !verified {
            return Err(LedgerError::ProofInvalid);
        }

        let owner_key = DataKey::Owner(commitment.clone());
        if env.storage().persistent().has(&owner_key) {
            return Err(LedgerError::DuplicateCommitment);
        }

        let record = CommitmentRecord {
            submitter: caller.clone(),
            commitment: commitment.clone(),
            timestamp: env.ledger().timestamp(),
        };

        let records_key = DataKey::Records(caller.clone());
        let mut records = records_of(&env, &caller);
        records.push_back(record.clone());
        env.storage().persistent().set(&records_key, &records);
        env.storage()
            .persistent()
            .extend_ttl(&records_key, TTL_THRESHOLD, TTL_EXTEND_TO);

        env.storage().persistent().set(&owner_key, &caller);
        env.storage()
            .persistent()
            .extend_ttl(&owner_key, TTL_THRESHOLD, TTL_EXTEND_TO);

        let total: u64 = env.storage().instance().get(&TOTAL).unwrap_or(0);
        env.storage()
            .instance()
            .set(&TOTAL, &total.saturating_add(1));
        extend_instance(&env);

        events::publish_commitment_added(&env, caller, commitment, record.timestamp);
        Ok(record)
    }

    /// All commitments recorded for `identity`, oldest first.
    pub fn get_commitments(env: Env, identity: Address) -> Vec<CommitmentRecord> {
        records_of(&env, &identity)
    }

    pub fn get_commitment_count(env: Env, identity: Address) -> u32 {
        records_of(&env, &identity).len()
    }

    /// Whether `commitment` has been accepted from anyone.
    pub fn verify_commitment(env: Env, commitment: BytesN<32>) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Owner(commitment))
    }

    pub fn get_commitment_owner(env: Env, commitment: BytesN<32>) -> Option<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Owner(commitment))
    }

    pub fn total_commitments(env: Env) -> u64 {
        env.storage().instance().get(&TOTAL).unwrap_or(0)
    }
}
