#![no_std]

//! Role registry consulted by every role-gated MedTrace contract.
//!
//! Roles are a flat set of `(Role, Address)` grants. Only holders of
//! [`Role::Admin`] may grant or revoke, and both operations are idempotent:
//! re-granting a held role or revoking an absent one succeeds without touching
//! storage or emitting an event.

pub mod events;


pub use common::Role;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec,
};

use common::{TTL_EXTEND_TO, TTL_THRESHOLD};

const INITIALIZED: Symbol = symbol_short!("INIT");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum DataKey {
    Grant(Role, Address),
    Members(Role),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AccessControlError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
}

fn has_grant(env: &Env, role: Role, account: &Address) -> bool {
    let key = DataKey::Grant(role, account.clone());
    let held = env.storage().persistent().get(&key).unwrap_or(false);
    if held {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    held
}

fn members(env: &Env, role: Role) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Members(role))
        .unwrap_or(Vec::new(env))
}

fn store_members(env: &Env, role: Role, list: &Vec<Address>) {
    let key = DataKey::Members(role);
    env.storage().persistent().set(&key, list);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Write a grant. Returns `false` when the account already held the role.
fn insert_grant(env: &Env, role: Role, account: &Address) -> bool {
    if has_grant(env, role, account) {
        return false;
    }

    let key = DataKey::Grant(role, account.clone());
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

    let mut list = members(env, role);
    list.push_back(account.clone());
    store_members(env, role, &list);
    true
}

/// Remove a grant. Returns `false` when there was nothing to remove.
fn remove_grant(env: &Env, role: Role, account: &Address) -> bool {
    if !has_grant(env, role, account) {
        return false;
    }

    env.storage()
        .persistent()
        .remove(&DataKey::Grant(role, account.clone()));

    let mut list = members(env, role);
    if let Some(idx) = list.first_index_of(account) {
        list.remove(idx);
    }
    store_members(env, role, &list);
    true
}

#[contract]
pub struct AccessControlContract;

#[contractimpl]
impl AccessControlContract {
    /// One-time setup. `admin` receives the first [`Role::Admin`] grant.
    pub fn initialize(env: Env, admin: Address) -> Result<(), AccessControlError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(AccessControlError::AlreadyInitialized);
        }
        admin.require_auth();

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);

        insert_grant(&env, Role::Admin, &admin);
        events::publish_initialized(&env, admin.clone());
        events::publish_role_granted(&env, Role::Admin, admin.clone(), admin);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), AccessControlError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(AccessControlError::NotInitialized);
        }
        caller.require_auth();
        if !has_grant(env, Role::Admin, caller) {
            return Err(AccessControlError::Unauthorized);
        }
        Ok(())
    }

    /// Grant `role` to `account`. Caller must hold Admin.
    pub fn grant_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), AccessControlError> {
        Self::require_admin(&env, &caller)?;

        if insert_grant(&env, role, &account) {
            events::publish_role_granted(&env, role, account, caller);
        }
        Ok(())
    }

    /// Revoke `role` from `account`. Caller must hold Admin.
    ///
    /// An admin may revoke its own Admin grant, including the last one; the
    /// registry is then frozen until redeployed.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), AccessControlError> {
        Self::require_admin(&env, &caller)?;

        if remove_grant(&env, role, &account) {
            events::publish_role_revoked(&env, role, account, caller);
        }
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        has_grant(&env, role, &account)
    }

    /// Roles held by `account`, in discriminant order.
    pub fn get_roles(env: Env, account: Address) -> Vec<Role> {
        let mut held = Vec::new(&env);
        for role in Role::ALL {
            if has_grant(&env, role, &account) {
                held.push_back(role);
            }
        }
        held
    }

    /// Current holders of `role`, in grant order.
    pub fn get_role_members(env: Env, role: Role) -> Vec<Address> {
        members(&env, role)
    }
}
