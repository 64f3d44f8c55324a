use std::path::Path;

use anyhow::Context;
use tracing::info;
use zk_prover::encode::{signals_arg, ProofArg};
use zk_prover::{FieldElement, PipelineOutput};

use crate::gateway::{InvokeMode, LedgerGateway};

/// Generate circuit artifacts into `artifacts_dir`.
pub fn setup(artifacts_dir: &Path, seed: Option<u64>) -> anyhow::Result<()> {
    if seed.is_some() {
        tracing::warn!("deterministic setup requested; keys are not secure");
    }
    zk_prover::setup(artifacts_dir, seed)
        .with_context(|| format!("setting up circuit in {}", artifacts_dir.display()))?;
    Ok(())
}

pub fn generate_proof(
    file: &Path,
    salt: Option<&str>,
    artifacts_dir: &Path,
    out_dir: &Path,
) -> anyhow::Result<PipelineOutput> {
    let output = zk_prover::generate_proof_files(file, salt, artifacts_dir, out_dir)
        .with_context(|| format!("generating proof for {}", file.display()))?;
    Ok(output)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub commitment: FieldElement,
    pub tx_hash: Option<String>,
}

/// Submit a proof directory to the ledger.
///
/// The call is simulated first; a failing simulation aborts before anything
/// is sent.
pub fn submit_proof(gateway: &dyn LedgerGateway, proof_dir: &Path) -> anyhow::Result<SubmitOutcome> {
    let bundle = zk_prover::read_proof_files(proof_dir)
        .with_context(|| format!("reading proof files from {}", proof_dir.display()))?;
    let commitment = bundle
        .commitment()
        .with_context(|| format!("{} has no public signals", proof_dir.display()))?;

    let proof = ProofArg::from_arrays(&bundle.proof.to_arrays()?);
    let signals = signals_arg(&bundle.public_signals);

    gateway
        .submit_commitment(&proof, &signals, InvokeMode::Simulate)
        .context("simulation rejected the submission")?;
    let receipt = gateway.submit_commitment(&proof, &signals, InvokeMode::Send)?;

    info!(%commitment, tx = ?receipt.tx_hash, "commitment submitted");
    Ok(SubmitOutcome {
        commitment,
        tx_hash: receipt.tx_hash,
    })
}

/// Check whether a decimal commitment has been recorded.
pub fn verify_commitment(gateway: &dyn LedgerGateway, commitment: &str) -> anyhow::Result<bool> {
    let value = FieldElement::from_canonical_decimal(commitment)?;
    Ok(gateway.verify_commitment(&value.to_be_bytes())?)
}
