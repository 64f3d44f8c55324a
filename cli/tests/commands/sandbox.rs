//! In-process [`LedgerGateway`] over a soroban test environment.
//!
//! Accounts are referred to by name (`"admin"`, `"acme"`, ...) and mapped to
//! generated addresses on first use.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Debug;

use access_control::{AccessControlContract, AccessControlContractClient};
use commitment_ledger::{CommitmentLedgerContract, CommitmentLedgerContractClient};
use common::{Proof, Role};
use medtrace_cli::gateway::{
    BatchInfo, Contract, ContractErrorKind, GatewayError, InvokeMode, LedgerGateway, Receipt,
    Result, TransferInfo,
};
use medtrace_cli::BatchId;
use mock_verifier::MockVerifierContract;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, BytesN, Env, InvokeError, String as SorobanString, Vec};
use supply_chain::{SupplyChainContract, SupplyChainContractClient};
use zk_prover::encode::{contract_verification_key, ProofArg};
use zk_prover::CircuitArtifacts;
use zk_verifier::{ZkVerifierContract, ZkVerifierContractClient};

pub const ADMIN: &str = "admin";

pub struct Sandbox {
    pub env: Env,
    pub roles: AccessControlContractClient<'static>,
    pub ledger: CommitmentLedgerContractClient<'static>,
    pub registry: SupplyChainContractClient<'static>,
    names: RefCell<HashMap<String, Address>>,
    current: RefCell<String>,
    /// Fail the next simulation with this error.
    pub reject_simulation: Cell<Option<ContractErrorKind>>,
    pub simulations: Cell<u32>,
    pub sends: Cell<u32>,
}

fn settle<T, CE: Debug, E: Into<soroban_sdk::Error>>(
    contract: Contract,
    result: std::result::Result<std::result::Result<T, CE>, std::result::Result<E, InvokeError>>,
) -> Result<T> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(e)) => Err(GatewayError::Contract {
            contract,
            kind: ContractErrorKind::from_code(contract, e.into().get_code()),
        }),
        Ok(Err(e)) => Err(GatewayError::Connectivity(format!("{e:?}"))),
        Err(Err(e)) => Err(GatewayError::Connectivity(format!("{e:?}"))),
    }
}

fn std_string(s: &SorobanString) -> String {
    let mut buf = vec![0u8; s.len() as usize];
    s.copy_into_slice(&mut buf);
    String::from_utf8(buf).unwrap()
}

fn word(hex_str: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut out).unwrap();
    out
}

impl Sandbox {
    /// Full deployment whose ledger accepts every proof.
    pub fn with_mock_verifier() -> Self {
        let env = Env::default();
        let verifier = env.register(MockVerifierContract, ());
        Self::deploy(env, verifier)
    }

    /// Full deployment verifying proofs against `artifacts`.
    pub fn with_artifacts(artifacts: &CircuitArtifacts) -> Self {
        let env = Env::default();
        env.cost_estimate().budget().reset_unlimited();
        env.mock_all_auths();

        let verifier_id = env.register(ZkVerifierContract, ());
        let verifier = ZkVerifierContractClient::new(&env, &verifier_id);
        let owner = Address::generate(&env);
        verifier.initialize(&owner);
        verifier.set_verification_key(
            &owner,
            &contract_verification_key(&env, &artifacts.verifying_key),
        );
        Self::deploy(env, verifier_id)
    }

    fn deploy(env: Env, verifier: Address) -> Self {
        env.mock_all_auths();
        let admin = Address::generate(&env);

        let ac_id = env.register(AccessControlContract, ());
        let roles = AccessControlContractClient::new(&env, &ac_id);
        roles.initialize(&admin);

        let ledger_id = env.register(CommitmentLedgerContract, ());
        let ledger = CommitmentLedgerContractClient::new(&env, &ledger_id);
        ledger.initialize(&admin, &ac_id, &verifier);

        let registry_id = env.register(SupplyChainContract, ());
        let registry = SupplyChainContractClient::new(&env, &registry_id);
        registry.initialize(&admin, &ac_id);

        let mut names = HashMap::new();
        names.insert(ADMIN.to_string(), admin);

        Self {
            env,
            roles,
            ledger,
            registry,
            names: RefCell::new(names),
            current: RefCell::new(ADMIN.to_string()),
            reject_simulation: Cell::new(None),
            simulations: Cell::new(0),
            sends: Cell::new(0),
        }
    }

    pub fn address(&self, name: &str) -> Address {
        self.names
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| Address::generate(&self.env))
            .clone()
    }

    fn name_of(&self, address: &Address) -> String {
        self.names
            .borrow()
            .iter()
            .find(|(_, a)| *a == address)
            .map(|(n, _)| n.clone())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    /// Sign subsequent calls as `name`.
    pub fn act_as(&self, name: &str) {
        self.address(name);
        *self.current.borrow_mut() = name.to_string();
    }

    /// Grant `role` to `name` as the admin, without touching the current signer.
    pub fn grant(&self, role: Role, name: &str) {
        let admin = self.address(ADMIN);
        self.roles.grant_role(&admin, &role, &self.address(name));
    }

    fn signer(&self) -> Address {
        self.address(&self.current.borrow())
    }

    fn id(&self, batch: &BatchId) -> BytesN<32> {
        BytesN::from_array(&self.env, &batch.0)
    }

    fn text(&self, s: &str) -> SorobanString {
        SorobanString::from_str(&self.env, s)
    }

    fn sent(&self) -> Receipt {
        self.sends.set(self.sends.get() + 1);
        Receipt::default()
    }

    fn proof(&self, arg: &ProofArg) -> Proof {
        let mut a = [0u8; 64];
        a[..32].copy_from_slice(&word(&arg.a.x));
        a[32..].copy_from_slice(&word(&arg.a.y));
        let mut b = [0u8; 128];
        for (i, limb) in arg.b.x.iter().chain(arg.b.y.iter()).enumerate() {
            b[i * 32..(i + 1) * 32].copy_from_slice(&word(limb));
        }
        let mut c = [0u8; 64];
        c[..32].copy_from_slice(&word(&arg.c.x));
        c[32..].copy_from_slice(&word(&arg.c.y));
        Proof::from_arrays(&self.env, &a, &b, &c)
    }
}

impl LedgerGateway for Sandbox {
    fn caller(&self) -> Result<String> {
        Ok(self.current.borrow().clone())
    }

    fn has_role(&self, role: Role, account: &str) -> Result<bool> {
        Ok(self.roles.has_role(&role, &self.address(account)))
    }

    fn grant_role(&self, role: Role, account: &str) -> Result<Receipt> {
        settle(
            Contract::AccessControl,
            self.roles
                .try_grant_role(&self.signer(), &role, &self.address(account)),
        )?;
        Ok(self.sent())
    }

    fn revoke_role(&self, role: Role, account: &str) -> Result<Receipt> {
        settle(
            Contract::AccessControl,
            self.roles
                .try_revoke_role(&self.signer(), &role, &self.address(account)),
        )?;
        Ok(self.sent())
    }

    fn submit_commitment(
        &self,
        proof: &ProofArg,
        signals: &[String],
        mode: InvokeMode,
    ) -> Result<Receipt> {
        if mode == InvokeMode::Simulate {
            self.simulations.set(self.simulations.get() + 1);
            return match self.reject_simulation.take() {
                Some(kind) => Err(GatewayError::Contract {
                    contract: Contract::Ledger,
                    kind,
                }),
                None => Ok(Receipt::default()),
            };
        }

        let mut public_signals = Vec::new(&self.env);
        for s in signals {
            public_signals.push_back(BytesN::from_array(&self.env, &word(s)));
        }
        settle(
            Contract::Ledger,
            self.ledger
                .try_submit_commitment(&self.signer(), &self.proof(proof), &public_signals),
        )?;
        Ok(self.sent())
    }

    fn verify_commitment(&self, commitment: &[u8; 32]) -> Result<bool> {
        Ok(self
            .ledger
            .verify_commitment(&BytesN::from_array(&self.env, commitment)))
    }

    fn batch_exists(&self, batch: &BatchId) -> Result<bool> {
        Ok(self.registry.batch_exists(&self.id(batch)))
    }

    fn batch_info(&self, batch: &BatchId) -> Result<BatchInfo> {
        let b = settle(
            Contract::Registry,
            self.registry.try_get_batch_info(&self.id(batch)),
        )?;
        Ok(BatchInfo {
            batch_id: hex::encode(b.batch_id.to_array()),
            drug_name: std_string(&b.drug_name),
            manufacturer: self.name_of(&b.manufacturer),
            manufacturing_date: b.manufacturing_date,
            expiry_date: b.expiry_date,
            is_active: b.is_active,
            current_owner: self.name_of(&b.current_owner),
        })
    }

    fn transfer_history(&self, batch: &BatchId) -> Result<std::vec::Vec<TransferInfo>> {
        Ok(self
            .registry
            .get_transfer_history(&self.id(batch))
            .iter()
            .map(|t| TransferInfo {
                from: self.name_of(&t.from),
                to: self.name_of(&t.to),
                timestamp: t.timestamp,
                location: std_string(&t.location),
            })
            .collect())
    }

    fn register_batch(
        &self,
        batch: &BatchId,
        drug_name: &str,
        manufacturing_date: u64,
        expiry_date: u64,
    ) -> Result<Receipt> {
        settle(
            Contract::Registry,
            self.registry.try_register_batch(
                &self.signer(),
                &self.id(batch),
                &self.text(drug_name),
                &manufacturing_date,
                &expiry_date,
            ),
        )?;
        Ok(self.sent())
    }

    fn transfer_batch(&self, batch: &BatchId, to: &str, location: &str) -> Result<Receipt> {
        settle(
            Contract::Registry,
            self.registry.try_transfer_batch(
                &self.signer(),
                &self.id(batch),
                &self.address(to),
                &self.text(location),
            ),
        )?;
        Ok(self.sent())
    }

    fn deactivate_batch(&self, batch: &BatchId) -> Result<Receipt> {
        settle(
            Contract::Registry,
            self.registry
                .try_deactivate_batch(&self.signer(), &self.id(batch)),
        )?;
        Ok(self.sent())
    }

    fn log_anomaly_check(
        &self,
        batch: &BatchId,
        prediction_hash: &[u8; 32],
        anomaly_type: &str,
    ) -> Result<Receipt> {
        settle(
            Contract::Registry,
            self.registry.try_log_anomaly_check(
                &self.signer(),
                &self.id(batch),
                &BytesN::from_array(&self.env, prediction_hash),
                &self.text(anomaly_type),
            ),
        )?;
        Ok(self.sent())
    }
}
