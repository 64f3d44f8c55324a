use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{Duration, NaiveDate, Utc};
use common::Role;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::batch_id::BatchId;
use crate::gateway::{
    BatchInfo, Contract, ContractErrorKind, GatewayError, LedgerGateway, Receipt, TransferInfo,
};

/// Drug name given to batches created implicitly by `log-anomaly`.
pub const PLACEHOLDER_DRUG_NAME: &str = "UNREGISTERED";

/// Parse `YYYY-MM-DD` into a UNIX timestamp at midnight UTC.
pub fn parse_date(s: &str) -> anyhow::Result<u64> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("'{s}' is not a YYYY-MM-DD date"))?;
    let ts = date
        .and_hms_opt(0, 0, 0)
        .context("invalid time of day")?
        .and_utc()
        .timestamp();
    u64::try_from(ts).with_context(|| format!("{s} is before 1970"))
}

pub fn register_batch(
    gateway: &dyn LedgerGateway,
    batch: &BatchId,
    drug_name: &str,
    manufacturing_date: u64,
    expiry_date: u64,
) -> anyhow::Result<Receipt> {
    if drug_name.trim().is_empty() {
        bail!("drug name must not be empty");
    }
    if expiry_date <= manufacturing_date {
        bail!("expiry date must be after the manufacturing date");
    }
    let receipt = gateway.register_batch(batch, drug_name, manufacturing_date, expiry_date)?;
    info!(%batch, drug_name, "batch registered");
    Ok(receipt)
}

pub fn transfer_batch(
    gateway: &dyn LedgerGateway,
    batch: &BatchId,
    to: &str,
    location: &str,
) -> anyhow::Result<Receipt> {
    let receipt = gateway.transfer_batch(batch, to, location)?;
    info!(%batch, to, location, "batch transferred");
    Ok(receipt)
}

pub fn deactivate_batch(gateway: &dyn LedgerGateway, batch: &BatchId) -> anyhow::Result<Receipt> {
    let receipt = gateway.deactivate_batch(batch)?;
    info!(%batch, "batch deactivated");
    Ok(receipt)
}

/// Batch record plus its custody chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    pub info: BatchInfo,
    pub transfers: Vec<TransferInfo>,
}

pub fn batch_info(gateway: &dyn LedgerGateway, batch: &BatchId) -> anyhow::Result<BatchReport> {
    let info = gateway.batch_info(batch)?;
    let transfers = gateway.transfer_history(batch)?;
    Ok(BatchReport { info, transfers })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnomalyOutcome {
    pub prediction_hash: [u8; 32],
    pub placeholder_registered: bool,
    pub receipt: Receipt,
}

/// Attach an anomaly check to `batch`.
///
/// The prediction document is hashed with SHA-256. When the batch is unknown
/// and the caller holds both Manufacturer and MlLogger, a placeholder batch is
/// registered first; otherwise the registry's `BatchNotFound` is returned as
/// is. Nothing is written unless the log itself can be accepted.
pub fn log_anomaly(
    gateway: &dyn LedgerGateway,
    batch: &BatchId,
    prediction_file: &Path,
    anomaly_type: &str,
) -> anyhow::Result<AnomalyOutcome> {
    if anomaly_type.trim().is_empty() {
        bail!("anomaly type must not be empty");
    }
    let content = fs::read(prediction_file)
        .with_context(|| format!("reading {}", prediction_file.display()))?;
    let prediction_hash: [u8; 32] = Sha256::digest(&content).into();

    let mut placeholder_registered = false;
    if !gateway.batch_exists(batch)? {
        let caller = gateway.caller()?;
        if gateway.has_role(Role::Manufacturer, &caller)? {
            if !gateway.has_role(Role::MlLogger, &caller)? {
                return Err(GatewayError::Contract {
                    contract: Contract::Registry,
                    kind: ContractErrorKind::Unauthorized,
                }
                .into());
            }
            let now = Utc::now();
            let manufactured = u64::try_from(now.timestamp()).unwrap_or_default();
            let expires = u64::try_from((now + Duration::days(365)).timestamp())
                .unwrap_or(manufactured + 1);
            gateway.register_batch(batch, PLACEHOLDER_DRUG_NAME, manufactured, expires)?;
            placeholder_registered = true;
            warn!(%batch, "registered placeholder batch for anomaly log");
        }
    }

    let receipt = gateway.log_anomaly_check(batch, &prediction_hash, anomaly_type)?;
    info!(%batch, anomaly_type, hash = %hex::encode(prediction_hash), "anomaly check logged");
    Ok(AnomalyOutcome {
        prediction_hash,
        placeholder_registered,
        receipt,
    })
}
