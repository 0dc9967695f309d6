/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Roles known to the registry. Profile types mirror these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    AccountOwner,
    StandardProfile,
    ChildProfile,
}

#[derive(Debug, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl RoleName {
    pub const ALL: [RoleName; 3] = [
        RoleName::AccountOwner,
        RoleName::StandardProfile,
        RoleName::ChildProfile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::AccountOwner => "account_owner",
            RoleName::StandardProfile => "standard_profile",
            RoleName::ChildProfile => "child_profile",
        }
    }

    pub fn is_account_owner(&self) -> bool {
        matches!(self, RoleName::AccountOwner)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// Lets sqlx decode TEXT columns straight into the enum
impl TryFrom<String> for RoleName {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
