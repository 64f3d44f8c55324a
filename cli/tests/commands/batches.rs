use std::fs;

use common::Role;
use medtrace_cli::commands::{self, PLACEHOLDER_DRUG_NAME};
use medtrace_cli::{BatchId, ContractErrorKind, GatewayError};
use sha2::{Digest, Sha256};

use crate::sandbox::{Sandbox, ADMIN};

const MFG: u64 = 1_767_225_600;
const EXP: u64 = MFG + 2 * 365 * 86_400;

fn kind(err: &anyhow::Error) -> Option<ContractErrorKind> {
    err.downcast_ref::<GatewayError>()
        .and_then(GatewayError::contract_kind)
}

fn with_manufacturer() -> Sandbox {
    let sb = Sandbox::with_mock_verifier();
    sb.grant(Role::Manufacturer, "acme");
    sb.act_as("acme");
    sb
}

#[test]
fn register_transfer_and_report() {
    let sb = with_manufacturer();
    let lot = BatchId::parse("LOT-2026-001");

    commands::register_batch(&sb, &lot, "Amoxicillin 500mg", MFG, EXP).unwrap();
    commands::transfer_batch(&sb, &lot, "dist", "Rotterdam DC").unwrap();

    let report = commands::batch_info(&sb, &lot).unwrap();
    assert_eq!(report.info.batch_id, lot.to_hex());
    assert_eq!(report.info.drug_name, "Amoxicillin 500mg");
    assert_eq!(report.info.manufacturer, "acme");
    assert_eq!(report.info.current_owner, "dist");
    assert!(report.info.is_active);
    assert_eq!(report.transfers.len(), 1);
    assert_eq!(report.transfers[0].from, "acme");
    assert_eq!(report.transfers[0].location, "Rotterdam DC");
}

#[test]
fn bad_dates_never_reach_the_registry() {
    let sb = with_manufacturer();
    let lot = BatchId::parse("LOT-BAD");

    assert!(commands::register_batch(&sb, &lot, "Ibuprofen", EXP, MFG).is_err());
    assert!(commands::register_batch(&sb, &lot, "Ibuprofen", MFG, MFG).is_err());
    assert!(commands::register_batch(&sb, &lot, "  ", MFG, EXP).is_err());
    assert_eq!(sb.sends.get(), 0);
    assert_eq!(sb.registry.get_batch_count(), 0);
}

#[test]
fn duplicate_registration_is_reported() {
    let sb = with_manufacturer();
    let lot = BatchId::parse("LOT-DUP");
    commands::register_batch(&sb, &lot, "Paracetamol", MFG, EXP).unwrap();

    let err = commands::register_batch(&sb, &lot, "Other", MFG, EXP).unwrap_err();
    assert_eq!(kind(&err), Some(ContractErrorKind::BatchAlreadyExists));
    assert_eq!(
        commands::batch_info(&sb, &lot).unwrap().info.drug_name,
        "Paracetamol"
    );
}

#[test]
fn only_the_owner_can_transfer() {
    let sb = with_manufacturer();
    let lot = BatchId::parse("LOT-OWN");
    commands::register_batch(&sb, &lot, "Insulin", MFG, EXP).unwrap();

    sb.act_as("thief");
    let err = commands::transfer_batch(&sb, &lot, "thief", "Nowhere").unwrap_err();
    assert_eq!(kind(&err), Some(ContractErrorKind::NotOwner));
    assert_eq!(commands::batch_info(&sb, &lot).unwrap().info.current_owner, "acme");
}

#[test]
fn deactivated_batch_is_frozen() {
    let sb = with_manufacturer();
    let lot = BatchId::parse("LOT-RECALL");
    commands::register_batch(&sb, &lot, "Heparin", MFG, EXP).unwrap();

    sb.act_as(ADMIN);
    commands::deactivate_batch(&sb, &lot).unwrap();
    assert!(!commands::batch_info(&sb, &lot).unwrap().info.is_active);

    sb.act_as("acme");
    let err = commands::transfer_batch(&sb, &lot, "dist", "Hamburg").unwrap_err();
    assert_eq!(kind(&err), Some(ContractErrorKind::BatchInactive));
}

#[test]
fn unknown_batch_info_is_not_found() {
    let sb = Sandbox::with_mock_verifier();
    let err = commands::batch_info(&sb, &BatchId::parse("LOT-404")).unwrap_err();
    assert_eq!(kind(&err), Some(ContractErrorKind::BatchNotFound));
}

#[test]
fn anomaly_on_missing_batch_registers_placeholder_for_manufacturer() {
    let sb = Sandbox::with_mock_verifier();
    sb.grant(Role::Manufacturer, "lab");
    sb.grant(Role::MlLogger, "lab");
    sb.act_as("lab");

    let dir = tempfile::tempdir().unwrap();
    let prediction = dir.path().join("prediction.json");
    fs::write(&prediction, br#"{"score":0.97}"#).unwrap();

    let lot = BatchId::parse("LOT-UNSEEN");
    let outcome =
        commands::log_anomaly(&sb, &lot, &prediction, "temperature-excursion").unwrap();

    assert!(outcome.placeholder_registered);
    let expected: [u8; 32] = Sha256::digest(br#"{"score":0.97}"#).into();
    assert_eq!(outcome.prediction_hash, expected);

    let info = commands::batch_info(&sb, &lot).unwrap().info;
    assert_eq!(info.drug_name, PLACEHOLDER_DRUG_NAME);
    assert_eq!(info.manufacturer, "lab");
    assert_eq!(sb.registry.get_anomaly_count(&soroban_sdk::BytesN::from_array(&sb.env, &lot.0)), 1);
}

#[test]
fn anomaly_on_missing_batch_fails_without_manufacturer() {
    let sb = Sandbox::with_mock_verifier();
    sb.grant(Role::MlLogger, "model");
    sb.act_as("model");

    let dir = tempfile::tempdir().unwrap();
    let prediction = dir.path().join("p.json");
    fs::write(&prediction, b"{}").unwrap();

    let lot = BatchId::parse("LOT-GHOST");
    let err = commands::log_anomaly(&sb, &lot, &prediction, "anomaly").unwrap_err();
    assert_eq!(kind(&err), Some(ContractErrorKind::BatchNotFound));
    assert_eq!(sb.registry.get_batch_count(), 0);
}

#[test]
fn anomaly_on_existing_batch_skips_registration() {
    let sb = with_manufacturer();
    let lot = BatchId::parse("LOT-KNOWN");
    commands::register_batch(&sb, &lot, "Metformin", MFG, EXP).unwrap();
    sb.grant(Role::MlLogger, "model");
    sb.act_as("model");

    let dir = tempfile::tempdir().unwrap();
    let prediction = dir.path().join("p.json");
    fs::write(&prediction, b"[1,2,3]").unwrap();

    let outcome = commands::log_anomaly(&sb, &lot, &prediction, "counterfeit").unwrap();
    assert!(!outcome.placeholder_registered);
    assert_eq!(sb.registry.get_batch_count(), 1);
}

#[test]
fn anomaly_from_manufacturer_without_logger_role_leaves_no_placeholder() {
    let sb = Sandbox::with_mock_verifier();
    sb.grant(Role::Manufacturer, "maker");
    sb.act_as("maker");

    let dir = tempfile::tempdir().unwrap();
    let prediction = dir.path().join("p.json");
    fs::write(&prediction, b"{}").unwrap();

    let lot = BatchId::parse("LOT-NO-LOGGER");
    let err = commands::log_anomaly(&sb, &lot, &prediction, "anomaly").unwrap_err();
    assert_eq!(kind(&err), Some(ContractErrorKind::Unauthorized));
    assert_eq!(sb.sends.get(), 0);
    assert_eq!(sb.registry.get_batch_count(), 0);
}

#[test]
fn blank_anomaly_type_is_rejected_before_any_write() {
    let sb = Sandbox::with_mock_verifier();
    sb.grant(Role::Manufacturer, "lab");
    sb.grant(Role::MlLogger, "lab");
    sb.act_as("lab");

    let dir = tempfile::tempdir().unwrap();
    let prediction = dir.path().join("p.json");
    fs::write(&prediction, b"{}").unwrap();

    assert!(commands::log_anomaly(&sb, &BatchId::parse("LOT-BLANK"), &prediction, " ").is_err());
    assert_eq!(sb.sends.get(), 0);
    assert_eq!(sb.registry.get_batch_count(), 0);
}
