use common::Role;
use medtrace_cli::commands;
use medtrace_cli::{ContractErrorKind, GatewayError, LedgerGateway};

use crate::sandbox::{Sandbox, ADMIN};

#[test]
fn admin_grants_and_revokes() {
    let sb = Sandbox::with_mock_verifier();

    commands::grant_role(&sb, Role::Distributor, "dist").unwrap();
    assert!(sb.has_role(Role::Distributor, "dist").unwrap());

    commands::revoke_role(&sb, Role::Distributor, "dist").unwrap();
    assert!(!sb.has_role(Role::Distributor, "dist").unwrap());
}

#[test]
fn non_admin_grant_is_unauthorized() {
    let sb = Sandbox::with_mock_verifier();
    sb.act_as("mallory");

    let err = commands::grant_role(&sb, Role::Admin, "mallory").unwrap_err();
    let gateway_err = err.downcast_ref::<GatewayError>().unwrap();
    assert_eq!(
        gateway_err.contract_kind(),
        Some(ContractErrorKind::Unauthorized)
    );
    assert!(!sb.has_role(Role::Admin, "mallory").unwrap());
    assert!(sb.has_role(Role::Admin, ADMIN).unwrap());
}
