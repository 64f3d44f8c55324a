//! Deployment records and environment settings.
//!
//! Contract addresses live in `deployments/<network>.json`. Signing identity
//! and RPC endpoint come from the environment (a `.env` file is loaded first);
//! neither is ever written back to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gateway::GatewayError;

pub const SOURCE_ENV: &str = "MEDTRACE_SOURCE";
pub const RPC_URL_ENV: &str = "MEDTRACE_RPC_URL";
pub const NETWORK_ENV: &str = "MEDTRACE_NETWORK";

pub const DEFAULT_NETWORK: &str = "testnet";
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// Addresses of one deployed contract suite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    pub access_control: String,
    pub verifier: String,
    pub ledger: String,
    pub registry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_verifier: Option<String>,
}

impl Deployment {
    pub fn path(dir: &Path, network: &str) -> PathBuf {
        dir.join(format!("{network}.json"))
    }

    pub fn load(dir: &Path, network: &str) -> Result<Self, GatewayError> {
        let path = Self::path(dir, network);
        let content = fs::read_to_string(&path).map_err(|e| GatewayError::Io {
            path: path.clone(),
            source: e,
        })?;
        let deployment: Self = serde_json::from_str(&content)
            .map_err(|e| GatewayError::Config(format!("{}: {e}", path.display())))?;

        if deployment.network != network {
            return Err(GatewayError::Config(format!(
                "{} describes network '{}', expected '{network}'",
                path.display(),
                deployment.network
            )));
        }
        Ok(deployment)
    }
}

/// Everything needed to reach the deployed contracts.
#[derive(Clone, Debug)]
pub struct Settings {
    pub network: String,
    pub source: String,
    pub rpc_url: Option<String>,
    pub deployment: Deployment,
}

impl Settings {
    /// Resolve settings from already-parsed CLI/env values plus the
    /// deployment record. The flag value wins over the record for `rpc_url`.
    pub fn resolve(
        network: &str,
        source: Option<String>,
        rpc_url: Option<String>,
        deployments_dir: &Path,
    ) -> Result<Self, GatewayError> {
        let source = source.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
            GatewayError::Config(format!("no signing identity: set {SOURCE_ENV} or pass --source"))
        })?;
        let deployment = Deployment::load(deployments_dir, network)?;
        let rpc_url = rpc_url.or_else(|| deployment.rpc_url.clone());

        Ok(Self {
            network: network.to_string(),
            source,
            rpc_url,
            deployment,
        })
    }
}

/// Load `.env` from the working directory if present.
pub fn load_dotenv() {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
}
