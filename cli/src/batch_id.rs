use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

/// 32-byte batch identifier as stored by the registry.
///
/// Parsing accepts exactly 64 hex characters verbatim; any other label is
/// hashed with SHA-256, so `LOT-2026-001` always maps to the same id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchId(pub [u8; 32]);

impl BatchId {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.len() == 64 {
            let mut bytes = [0u8; 32];
            if hex::decode_to_slice(label, &mut bytes).is_ok() {
                return BatchId(bytes);
            }
        }
        BatchId(Sha256::digest(label.as_bytes()).into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for BatchId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BatchId::parse(s))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
