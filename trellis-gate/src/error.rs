//! Gate error taxonomy.
//!
//! Four caller-visible classes, deliberately distinct: the HTTP layer maps
//! denial, conflict, not-found, and invalid-value to different status codes
//! and must never have to guess which one it got.

use crate::authorize::Operation;
use crate::store::StoreError;
use thiserror::Error;
use trellis_types::RecordId;

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;

/// Errors surfaced by the repository gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// The caller may not perform this operation on this entity.
    #[error("access denied: {operation} on entity '{entity}'")]
    AccessDenied { entity: String, operation: Operation },

    /// The operation is structurally impossible right now — an instance
    /// already exists under the entity's cardinality policy. Not a
    /// permissions problem.
    #[error("lifecycle conflict on entity '{entity}': {reason}")]
    LifecycleConflict { entity: String, reason: String },

    /// No such record — also reported for owner-based denials, so denial
    /// never doubles as an existence oracle.
    #[error("record not found: {entity}/{id}")]
    NotFound { entity: String, id: RecordId },

    /// A submitted value violates the field's declared constraints.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// The storage adapter failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GateError {
    pub(crate) fn denied(entity: &str, operation: Operation) -> Self {
        Self::AccessDenied {
            entity: entity.to_string(),
            operation,
        }
    }

    pub(crate) fn conflict(entity: &str, reason: impl Into<String>) -> Self {
        Self::LifecycleConflict {
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(entity: &str, id: RecordId) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
