use core::fmt;
use core::str::FromStr;

use soroban_sdk::contracttype;

/// Capabilities an identity can hold.
///
/// Roles are independent tags. `Admin` is not a superset of the others: every
/// entry point that needs elevated rights checks for `Admin` explicitly, and an
/// admin that wants to register batches must also be granted `Manufacturer`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Manufacturer = 1,
    Distributor = 2,
    HealthcareProvider = 3,
    MlLogger = 4,
    Admin = 5,
}

impl Role {
    /// Every role, in discriminant order.
    pub const ALL: [Role; 5] = [
        Role::Manufacturer,
        Role::Distributor,
        Role::HealthcareProvider,
        Role::MlLogger,
        Role::Admin,
    ];

    /// Stable lower-case label used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manufacturer => "manufacturer",
            Role::Distributor => "distributor",
            Role::HealthcareProvider => "healthcare-provider",
            Role::MlLogger => "ml-logger",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role label does not name any [`Role`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownRole;

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown role")
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both `ml-logger` and `ml_logger` style labels.
        let mut buf = [0u8; 32];
        let bytes = s.trim().as_bytes();
        if bytes.len() > buf.len() {
            return Err(UnknownRole);
        }
        for (i, b) in bytes.iter().enumerate() {
            buf[i] = match b {
                b'_' => b'-',
                other => other.to_ascii_lowercase(),
            };
        }
        let normalized = &buf[..bytes.len()];

        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().as_bytes() == normalized)
            .ok_or(UnknownRole)
    }
}
