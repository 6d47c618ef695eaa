//! Access levels and lifecycle modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permissiveness tier gating read or write operations.
///
/// Ordered most → least permissive: `Unauthenticated` > `Authenticated` >
/// `Owner`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Anyone, with or without an identity.
    #[default]
    Unauthenticated,
    /// Any caller with an authenticated identity.
    Authenticated,
    /// Only the caller recorded as the record's creator.
    Owner,
}

impl AccessLevel {
    /// Numeric permissiveness: higher means more callers qualify.
    #[must_use]
    pub const fn permissiveness(self) -> u8 {
        match self {
            Self::Unauthenticated => 2,
            Self::Authenticated => 1,
            Self::Owner => 0,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Owner => "owner",
        };
        write!(f, "{label}")
    }
}

/// Cardinality policy for an entity's records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    /// Any number of records.
    #[default]
    Default,
    /// At most one record per authenticated user.
    InstancePerUser,
    /// At most one record overall.
    Singleton,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Default => "default",
            Self::InstancePerUser => "instancePerUser",
            Self::Singleton => "singleton",
        };
        write!(f, "{label}")
    }
}
