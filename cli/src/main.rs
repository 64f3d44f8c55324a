//! MedTrace CLI
//!
//! # Usage
//!
//! ```bash
//! # Generate proving and verification keys
//! medtrace setup --artifacts circuit/
//!
//! # Commit to a record and submit the proof
//! medtrace generate-proof scan.pdf --out proof/
//! medtrace submit-proof proof/
//!
//! # Batch provenance
//! medtrace register-batch LOT-001 "Amoxicillin 500mg" --manufactured 2026-01-10 --expires 2028-01-10
//! medtrace transfer-batch LOT-001 GDIST... "Rotterdam DC"
//! medtrace log-anomaly LOT-001 prediction.json --anomaly-type temperature-excursion
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common::Role;
use medtrace_cli::commands;
use medtrace_cli::config::{self, Settings, DEFAULT_DEPLOYMENTS_DIR, DEFAULT_NETWORK};
use medtrace_cli::gateway::stellar::StellarCli;
use medtrace_cli::BatchId;

/// MedTrace provenance and record-commitment client
#[derive(Parser)]
#[command(name = "medtrace")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drug batch provenance and zero-knowledge record commitments", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    network: NetworkArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NetworkArgs {
    /// Network name; selects deployments/<network>.json
    #[arg(long, global = true, env = config::NETWORK_ENV, default_value = DEFAULT_NETWORK)]
    network: String,

    /// Signing identity known to the stellar client
    #[arg(long, global = true, env = config::SOURCE_ENV, hide_env_values = true)]
    source: Option<String>,

    /// RPC endpoint overriding the deployment record
    #[arg(long, global = true, env = config::RPC_URL_ENV)]
    rpc_url: Option<String>,

    /// Directory holding deployment records
    #[arg(long, global = true, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    deployments: PathBuf,

    /// Path to the stellar client binary
    #[arg(long, global = true, default_value = "stellar")]
    stellar_bin: PathBuf,
}

impl NetworkArgs {
    fn gateway(&self) -> anyhow::Result<StellarCli> {
        let settings = Settings::resolve(
            &self.network,
            self.source.clone(),
            self.rpc_url.clone(),
            &self.deployments,
        )?;
        Ok(StellarCli::with_binary(self.stellar_bin.clone(), settings))
    }
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse::<Role>().map_err(|_| {
        let known: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
        format!("unknown role '{s}' (expected one of: {})", known.join(", "))
    })
}

#[derive(Subcommand)]
enum Commands {
    /// Generate circuit proving and verification keys
    Setup {
        #[arg(long, default_value = "circuit")]
        artifacts: PathBuf,
        /// Fixed RNG seed; test deployments only
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Prove a commitment to a record file
    GenerateProof {
        file: PathBuf,
        /// Decimal salt; random when omitted
        #[arg(long)]
        salt: Option<String>,
        #[arg(long, default_value = "proof")]
        out: PathBuf,
        #[arg(long, default_value = "circuit")]
        artifacts: PathBuf,
    },

    /// Submit a proof directory to the commitment ledger
    SubmitProof { proof_dir: PathBuf },

    /// Check whether a decimal commitment is recorded
    VerifyCommitment { commitment: String },

    /// Attach an anomaly check to a batch
    LogAnomaly {
        batch: String,
        prediction_file: PathBuf,
        #[arg(long, default_value = "anomaly")]
        anomaly_type: String,
    },

    /// Register a new drug batch
    RegisterBatch {
        batch: String,
        drug_name: String,
        /// Manufacturing date, YYYY-MM-DD
        #[arg(long)]
        manufactured: String,
        /// Expiry date, YYYY-MM-DD
        #[arg(long)]
        expires: String,
    },

    /// Hand a batch to a new custodian
    TransferBatch {
        batch: String,
        to: String,
        location: String,
    },

    /// Permanently deactivate a batch
    DeactivateBatch { batch: String },

    /// Show a batch and its custody history
    BatchInfo { batch: String },

    /// Grant a role to an account
    GrantRole {
        #[arg(value_parser = parse_role)]
        role: Role,
        account: String,
    },

    /// Revoke a role from an account
    RevokeRole {
        #[arg(value_parser = parse_role)]
        role: Role,
        account: String,
    },
}

fn print_tx(tx_hash: Option<String>) {
    if let Some(hash) = tx_hash {
        println!("Transaction: {hash}");
    }
}

fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    medtrace_cli::logging::init(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Setup { artifacts, seed } => {
            commands::setup(&artifacts, seed)?;
            println!("Circuit artifacts written to {}", artifacts.display());
            println!(
                "Install the key with set_verification_key using {}",
                artifacts
                    .join(zk_prover::artifacts::VERIFICATION_KEY_JSON_FILE)
                    .display()
            );
        }
        Commands::GenerateProof {
            file,
            salt,
            out,
            artifacts,
        } => {
            let output = commands::generate_proof(&file, salt.as_deref(), &artifacts, &out)?;
            println!("Commitment: {}", output.generated.commitment);
            println!("Proof files written to {}", out.display());
        }
        Commands::SubmitProof { proof_dir } => {
            let gateway = cli.network.gateway()?;
            let outcome = commands::submit_proof(&gateway, &proof_dir)?;
            println!("Commitment: {}", outcome.commitment);
            print_tx(outcome.tx_hash);
        }
        Commands::VerifyCommitment { commitment } => {
            let gateway = cli.network.gateway()?;
            let recorded = commands::verify_commitment(&gateway, &commitment)?;
            println!("{recorded}");
        }
        Commands::LogAnomaly {
            batch,
            prediction_file,
            anomaly_type,
        } => {
            let gateway = cli.network.gateway()?;
            let id = BatchId::parse(&batch);
            let outcome = commands::log_anomaly(&gateway, &id, &prediction_file, &anomaly_type)?;
            if outcome.placeholder_registered {
                println!("Registered placeholder batch {id}");
            }
            println!("Prediction hash: {}", hex::encode(outcome.prediction_hash));
            print_tx(outcome.receipt.tx_hash);
        }
        Commands::RegisterBatch {
            batch,
            drug_name,
            manufactured,
            expires,
        } => {
            let gateway = cli.network.gateway()?;
            let id = BatchId::parse(&batch);
            let receipt = commands::register_batch(
                &gateway,
                &id,
                &drug_name,
                commands::parse_date(&manufactured)?,
                commands::parse_date(&expires)?,
            )?;
            println!("Batch id: {id}");
            print_tx(receipt.tx_hash);
        }
        Commands::TransferBatch {
            batch,
            to,
            location,
        } => {
            let gateway = cli.network.gateway()?;
            let receipt =
                commands::transfer_batch(&gateway, &BatchId::parse(&batch), &to, &location)?;
            print_tx(receipt.tx_hash);
        }
        Commands::DeactivateBatch { batch } => {
            let gateway = cli.network.gateway()?;
            let receipt = commands::deactivate_batch(&gateway, &BatchId::parse(&batch))?;
            print_tx(receipt.tx_hash);
        }
        Commands::BatchInfo { batch } => {
            let gateway = cli.network.gateway()?;
            let report = commands::batch_info(&gateway, &BatchId::parse(&batch))?;
            println!("{}", serde_json::to_string_pretty(&report.info)?);
            for t in &report.transfers {
                println!("{} -> {} at {} ({})", t.from, t.to, t.location, t.timestamp);
            }
        }
        Commands::GrantRole { role, account } => {
            let gateway = cli.network.gateway()?;
            print_tx(commands::grant_role(&gateway, role, &account)?.tx_hash);
        }
        Commands::RevokeRole { role, account } => {
            let gateway = cli.network.gateway()?;
            print_tx(commands::revoke_role(&gateway, role, &account)?.tx_hash);
        }
    }

    Ok(())
}
