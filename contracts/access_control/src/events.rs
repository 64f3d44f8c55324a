use common::Role;
use soroban_sdk::{symbol_short, Address, Env};

/// Event published when the registry is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when a role is granted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleGrantedEvent {
    pub role: Role,
    pub account: Address,
    pub granted_by: Address,
    pub timestamp: u64,
}

/// Event published when a role is revoked.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleRevokedEvent {
    pub role: Role,
    pub account: Address,
    pub revoked_by: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_role_granted(env: &Env, role: Role, account: Address, granted_by: Address) {
    let topics = (symbol_short!("ROLE_GRT"), account.clone());
    let data = RoleGrantedEvent {
        role,
        account,
        granted_by,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_role_revoked(env: &Env, role: Role, account: Address, revoked_by: Address) {
    let topics = (symbol_short!("ROLE_RVK"), account.clone());
    let data = RoleRevokedEvent {
        role,
        account,
        revoked_by,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}
