use soroban_sdk::{symbol_short, Address, BytesN, Env};

/// Event published when the ledger is wired to its collaborators.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub access_control: Address,
    pub verifier: Address,
    pub timestamp: u64,
}

/// Event published for every accepted commitment.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitmentAddedEvent {
    pub submitter: Address,
    pub commitment: BytesN<32>,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address, access_control: Address, verifier: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        access_control,
        verifier,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_commitment_added(
    env: &Env,
    submitter: Address,
    commitment: BytesN<32>,
    timestamp: u64,
) {
    let topics = (symbol_short!("CMT_ADD"), submitter.clone());
    let data = CommitmentAddedEvent {
        submitter,
        commitment,
        timestamp,
    };
    env.events().publish(topics, data);
}
