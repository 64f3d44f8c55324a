//! [`LedgerGateway`] backed by the `stellar` command-line client.

use std::cell::OnceCell;
use std::path::PathBuf;
use std::process::Command;

use common::Role;
use tracing::{debug, instrument, warn};
use zk_prover::encode::ProofArg;

use super::{
    BatchInfo, Contract, ContractErrorKind, GatewayError, InvokeMode, LedgerGateway, Receipt,
    Result, TransferInfo,
};
use crate::batch_id::BatchId;
use crate::config::Settings;

/// Network passphrases for the well-known network names.
fn passphrase(network: &str) -> Option<&'static str> {
    match network {
        "testnet" => Some("Test SDF Network ; September 2015"),
        "mainnet" | "pubnet" => Some("Public Global Stellar Network ; September 2015"),
        "futurenet" => Some("Test SDF Future Network ; October 2022"),
        "local" | "standalone" => Some("Standalone Network ; February 2017"),
        _ => None,
    }
}

/// Extract `N` from `... Error(Contract, #N) ...` in client output.
pub fn parse_contract_error(output: &str) -> Option<u32> {
    const MARKER: &str = "Error(Contract, #";
    let start = output.find(MARKER)? + MARKER.len();
    let digits: String = output[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Extract the transaction hash the client logs after sending.
pub fn parse_tx_hash(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| line.contains("Transaction hash is") || line.contains("Signing transaction:"))
        .filter_map(|line| line.split_whitespace().last())
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_hexdigit()))
        .find(|token| token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit()))
        .map(str::to_string)
}

struct Output {
    stdout: String,
    tx_hash: Option<String>,
}

pub struct StellarCli {
    binary: PathBuf,
    settings: Settings,
    caller: OnceCell<String>,
}

impl StellarCli {
    pub fn new(settings: Settings) -> Self {
        Self::with_binary(PathBuf::from("stellar"), settings)
    }

    pub fn with_binary(binary: PathBuf, settings: Settings) -> Self {
        Self {
            binary,
            settings,
            caller: OnceCell::new(),
        }
    }

    fn contract_id(&self, contract: Contract) -> &str {
        let d = &self.settings.deployment;
        match contract {
            Contract::AccessControl => &d.access_control,
            Contract::Verifier => &d.verifier,
            Contract::Ledger => &d.ledger,
            Contract::Registry => &d.registry,
        }
    }

    fn network_args(&self) -> Vec<String> {
        match (&self.settings.rpc_url, passphrase(&self.settings.network)) {
            (Some(url), Some(phrase)) => vec![
                "--rpc-url".into(),
                url.clone(),
                "--network-passphrase".into(),
                phrase.into(),
            ],
            _ => vec!["--network".into(), self.settings.network.clone()],
        }
    }

    /// Full argument vector for `stellar contract invoke`.
    pub fn invoke_args(
        &self,
        contract: Contract,
        function: &str,
        args: &[(&str, String)],
        mode: InvokeMode,
    ) -> Vec<String> {
        let mut argv: Vec<String> = vec![
            "contract".into(),
            "invoke".into(),
            "--id".into(),
            self.contract_id(contract).to_string(),
            "--source".into(),
            self.settings.source.clone(),
        ];
        argv.extend(self.network_args());
        if mode == InvokeMode::Simulate {
            argv.push("--send=no".into());
        }
        argv.push("--".into());
        argv.push(function.to_string());
        for (name, value) in args {
            argv.push(format!("--{name}"));
            argv.push(value.clone());
        }
        argv
    }

    fn run(&self, argv: &[String], contract: Contract) -> Result<Output> {
        debug!(binary = %self.binary.display(), args = ?argv, "running stellar client");
        let output = Command::new(&self.binary)
            .args(argv)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => GatewayError::Config(format!(
                    "stellar client not found at {}",
                    self.binary.display()
                )),
                _ => GatewayError::Io {
                    path: self.binary.clone(),
                    source: e,
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            if let Some(code) = parse_contract_error(&stderr) {
                return Err(GatewayError::Contract {
                    contract,
                    kind: ContractErrorKind::from_code(contract, code),
                });
            }
            warn!(status = ?output.status.code(), "stellar client failed");
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("client exited without output")
                .trim()
                .to_string();
            return Err(GatewayError::Connectivity(reason));
        }

        Ok(Output {
            stdout,
            tx_hash: parse_tx_hash(&stderr),
        })
    }

    fn invoke(
        &self,
        contract: Contract,
        function: &str,
        args: &[(&str, String)],
        mode: InvokeMode,
    ) -> Result<Output> {
        let argv = self.invoke_args(contract, function, args, mode);
        self.run(&argv, contract)
    }

    fn read(&self, contract: Contract, function: &str, args: &[(&str, String)]) -> Result<String> {
        Ok(self
            .invoke(contract, function, args, InvokeMode::Simulate)?
            .stdout)
    }

    fn send(&self, contract: Contract, function: &str, args: &[(&str, String)]) -> Result<Receipt> {
        let out = self.invoke(contract, function, args, InvokeMode::Send)?;
        Ok(Receipt {
            tx_hash: out.tx_hash,
        })
    }

    fn parse<T: for<'de> serde::Deserialize<'de>>(function: &str, stdout: &str) -> Result<T> {
        serde_json::from_str(stdout).map_err(|e| {
            GatewayError::Connectivity(format!("unexpected {function} output '{stdout}': {e}"))
        })
    }

    fn caller_arg(&self) -> Result<(&'static str, String)> {
        Ok(("caller", self.caller()?))
    }
}

fn role_arg(role: Role) -> (&'static str, String) {
    ("role", (role as u32).to_string())
}

fn batch_arg(batch: &BatchId) -> (&'static str, String) {
    ("batch_id", batch.to_hex())
}

impl LedgerGateway for StellarCli {
    #[instrument(skip(self))]
    fn caller(&self) -> Result<String> {
        if let Some(address) = self.caller.get() {
            return Ok(address.clone());
        }
        let argv = vec![
            "keys".to_string(),
            "address".to_string(),
            self.settings.source.clone(),
        ];
        let out = self.run(&argv, Contract::AccessControl)?;
        if out.stdout.is_empty() {
            return Err(GatewayError::Config(format!(
                "identity '{}' has no address",
                self.settings.source
            )));
        }
        Ok(self.caller.get_or_init(|| out.stdout).clone())
    }

    fn has_role(&self, role: Role, account: &str) -> Result<bool> {
        let out = self.read(
            Contract::AccessControl,
            "has_role",
            &[role_arg(role), ("account", account.to_string())],
        )?;
        Self::parse("has_role", &out)
    }

    fn grant_role(&self, role: Role, account: &str) -> Result<Receipt> {
        self.send(
            Contract::AccessControl,
            "grant_role",
            &[
                self.caller_arg()?,
                role_arg(role),
                ("account", account.to_string()),
            ],
        )
    }

    fn revoke_role(&self, role: Role, account: &str) -> Result<Receipt> {
        self.send(
            Contract::AccessControl,
            "revoke_role",
            &[
                self.caller_arg()?,
                role_arg(role),
                ("account", account.to_string()),
            ],
        )
    }

    #[instrument(skip(self, proof, signals))]
    fn submit_commitment(
        &self,
        proof: &ProofArg,
        signals: &[String],
        mode: InvokeMode,
    ) -> Result<Receipt> {
        let proof_json = serde_json::to_string(proof)
            .map_err(|e| GatewayError::Config(format!("proof argument: {e}")))?;
        let signals_json = serde_json::to_string(signals)
            .map_err(|e| GatewayError::Config(format!("public signals argument: {e}")))?;
        let args = [
            self.caller_arg()?,
            ("proof", proof_json),
            ("public_signals", signals_json),
        ];
        match mode {
            InvokeMode::Simulate => {
                self.invoke(Contract::Ledger, "submit_commitment", &args, mode)?;
                Ok(Receipt::default())
            }
            InvokeMode::Send => self.send(Contract::Ledger, "submit_commitment", &args),
        }
    }

    fn verify_commitment(&self, commitment: &[u8; 32]) -> Result<bool> {
        let out = self.read(
            Contract::Ledger,
            "verify_commitment",
            &[("commitment", hex::encode(commitment))],
        )?;
        Self::parse("verify_commitment", &out)
    }

    fn batch_exists(&self, batch: &BatchId) -> Result<bool> {
        let out = self.read(Contract::Registry, "batch_exists", &[batch_arg(batch)])?;
        Self::parse("batch_exists", &out)
    }

    fn batch_info(&self, batch: &BatchId) -> Result<BatchInfo> {
        let out = self.read(Contract::Registry, "get_batch_info", &[batch_arg(batch)])?;
        Self::parse("get_batch_info", &out)
    }

    fn transfer_history(&self, batch: &BatchId) -> Result<Vec<TransferInfo>> {
        let out = self.read(
            Contract::Registry,
            "get_transfer_history",
            &[batch_arg(batch)],
        )?;
        Self::parse("get_transfer_history", &out)
    }

    fn register_batch(
        &self,
        batch: &BatchId,
        drug_name: &str,
        manufacturing_date: u64,
        expiry_date: u64,
    ) -> Result<Receipt> {
        self.send(
            Contract::Registry,
            "register_batch",
            &[
                self.caller_arg()?,
                batch_arg(batch),
                ("drug_name", drug_name.to_string()),
                ("manufacturing_date", manufacturing_date.to_string()),
                ("expiry_date", expiry_date.to_string()),
            ],
        )
    }

    fn transfer_batch(&self, batch: &BatchId, to: &str, location: &str) -> Result<Receipt> {
        self.send(
            Contract::Registry,
            "transfer_batch",
            &[
                self.caller_arg()?,
                batch_arg(batch),
                ("to", to.to_string()),
                ("location", location.to_string()),
            ],
        )
    }

    fn deactivate_batch(&self, batch: &BatchId) -> Result<Receipt> {
        self.send(
            Contract::Registry,
            "deactivate_batch",
            &[self.caller_arg()?, batch_arg(batch)],
        )
    }

    fn log_anomaly_check(
        &self,
        batch: &BatchId,
        prediction_hash: &[u8; 32],
        anomaly_type: &str,
    ) -> Result<Receipt> {
        self.send(
            Contract::Registry,
            "log_anomaly_check",
            &[
                self.caller_arg()?,
                batch_arg(batch),
                ("prediction_hash", hex::encode(prediction_hash)),
                ("anomaly_type", anomaly_type.to_string()),
            ],
        )
    }
}
