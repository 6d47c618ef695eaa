//! The narrow interface the gate needs from a storage adapter.

use thiserror::Error;
use trellis_model::Record;
use trellis_schema::EntityDef;
use trellis_types::RecordId;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a storage adapter may surface.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A storage-level uniqueness constraint rejected the write. The
    /// repository maps this to a lifecycle conflict — it is the backstop
    /// that closes the check-then-create race for singleton and per-user
    /// entities.
    #[error("uniqueness conflict: {0}")]
    Conflict(String),

    /// Serialization/deserialization of a stored value failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure (connection, SQL, I/O).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Raw CRUD keyed by entity definition and record id.
///
/// Implementations own persistence and column mapping; they never make
/// access decisions. `owner` filters restrict listing/counting to one
/// creator — the gate uses them for owner-scoped reads and per-user
/// cardinality checks.
pub trait RecordStore {
    /// Ensures a table/column set matching the definition exists.
    fn ensure_entity(&self, def: &EntityDef) -> StoreResult<()>;

    /// Persists a fresh record.
    fn insert(&self, def: &EntityDef, record: &Record) -> StoreResult<()>;

    /// Fetches one record by id.
    fn get(&self, def: &EntityDef, id: RecordId) -> StoreResult<Option<Record>>;

    /// Lists records, optionally restricted to one owner, oldest first.
    fn list(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<Vec<Record>>;

    /// Overwrites an existing record's data and modification time.
    fn update(&self, def: &EntityDef, record: &Record) -> StoreResult<()>;

    /// Deletes one record; returns whether it existed.
    fn delete(&self, def: &EntityDef, id: RecordId) -> StoreResult<bool>;

    /// Counts records, optionally restricted to one owner.
    fn count(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<u64>;
}
