use common::Role;
use tracing::info;

use crate::gateway::{LedgerGateway, Receipt};

/// Grant `role` to `account`. Granting a held role is a no-op on chain.
pub fn grant_role(gateway: &dyn LedgerGateway, role: Role, account: &str) -> anyhow::Result<Receipt> {
    let receipt = gateway.grant_role(role, account)?;
    info!(%role, account, "role granted");
    Ok(receipt)
}

pub fn revoke_role(gateway: &dyn LedgerGateway, role: Role, account: &str) -> anyhow::Result<Receipt> {
    let receipt = gateway.revoke_role(role, account)?;
    info!(%role, account, "role revoked");
    Ok(receipt)
}
