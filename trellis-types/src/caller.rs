//! Request caller identity.
//!
//! The auth provider (out of scope for this core) resolves credentials or
//! session tokens into a [`Caller`] before the repository gate is consulted.
//! The gate only ever sees this enum — it has no notion of passwords,
//! tokens, or sessions.

use serde::{Deserialize, Serialize};

/// The identity attached to one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "username", rename_all = "lowercase")]
pub enum Caller {
    /// No authenticated identity.
    Anonymous,
    /// An authenticated user, identified by username.
    User(String),
}

impl Caller {
    /// Convenience constructor for an authenticated caller.
    pub fn user(username: impl Into<String>) -> Self {
        Self::User(username.into())
    }

    /// Whether this caller carries an authenticated identity.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// The authenticated username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(name) => Some(name),
        }
    }
}
