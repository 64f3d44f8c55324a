use soroban_sdk::{contractclient, Address, BytesN, Env, Vec};

use crate::proof::Proof;
use crate::roles::Role;

/// Anything the commitment ledger can ask to check a proof.
///
/// Implemented by the real Groth16 verifier and by the development verifier
/// that accepts everything. The ledger holds the verifier's address and talks
/// to it through the generated [`VerifierClient`].
#[contractclient(name = "VerifierClient")]
pub trait VerifierInterface {
    fn verify_proof(env: Env, proof: Proof, public_signals: Vec<BytesN<32>>) -> bool;
}

/// Read-only role lookup exposed by the access-control contract.
#[contractclient(name = "AccessControlClient")]
pub trait AccessControlInterface {
    fn has_role(env: Env, role: Role, account: Address) -> bool;
}
