//! Compilation errors.
//!
//! Every variant is a startup-time failure: an entity that does not compile
//! should prevent the application from starting, not degrade at request
//! time. Messages name the offending entity, fields, and levels so the
//! developer can fix the declaration without digging.

use crate::level::{AccessLevel, Lifecycle};
use thiserror::Error;

/// Result type for compilation and registration.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors produced while compiling or registering an entity definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Entity name is empty.
    #[error("entity name is empty")]
    EmptyEntityName,

    /// Entity name contains non-ASCII characters.
    #[error("entity name '{name}' must be ASCII")]
    NonAsciiEntityName { name: String },

    /// Entity name exceeds the maximum length.
    #[error("entity name '{name}' exceeds max length {max}")]
    EntityNameTooLong { name: String, max: usize },

    /// A field was declared with an empty name.
    #[error("entity '{entity}' declares a field with an empty name")]
    EmptyFieldName { entity: String },

    /// A field name exceeds the maximum length.
    #[error("field '{field}' in entity '{entity}' exceeds max length {max}")]
    FieldNameTooLong {
        entity: String,
        field: String,
        max: usize,
    },

    /// The same field name appears twice in the flattened declaration.
    #[error("duplicate field '{field}' in entity '{entity}'")]
    DuplicateField { entity: String, field: String },

    /// Two distinct field names map to the same storage column.
    #[error(
        "fields '{first}' and '{second}' in entity '{entity}' collide on storage column '{column}'"
    )]
    FieldNameCollision {
        entity: String,
        first: String,
        second: String,
        column: String,
    },

    /// writeLevel admits callers that readLevel excludes.
    #[error(
        "entity '{entity}': writeLevel ({write}) is more permissive than readLevel ({read})"
    )]
    WriteBroaderThanRead {
        entity: String,
        read: AccessLevel,
        write: AccessLevel,
    },

    /// A per-user singleton needs an identified reader.
    #[error(
        "entity '{entity}': lifecycle {lifecycle} requires readLevel other than unauthenticated"
    )]
    PerUserRequiresIdentity {
        entity: String,
        lifecycle: Lifecycle,
    },

    /// A shared singleton cannot be owner-scoped.
    #[error(
        "entity '{entity}': lifecycle singleton cannot be owner-scoped (readLevel {read}, writeLevel {write})"
    )]
    SingletonOwnerScoped {
        entity: String,
        read: AccessLevel,
        write: AccessLevel,
    },

    /// The registry already holds a definition under this name.
    #[error("entity '{name}' is already registered")]
    DuplicateEntity { name: String },

    /// Two registered entity names normalize to the same table.
    #[error("entities '{first}' and '{second}' collide on storage table '{table}'")]
    TableCollision {
        first: String,
        second: String,
        table: String,
    },
}
