//! Storage adapters for Trellis.
//!
//! Implements the gate's [`RecordStore`](trellis_gate::RecordStore) contract
//! twice:
//!
//! - [`MemoryStore`] — the reference implementation; keeps everything in
//!   process, useful for tests and ephemeral apps
//! - [`SqliteStore`] — one SQL table per entity, columns generated from the
//!   compiled schema (snake_case of the declared field names), arrays and
//!   file descriptors stored as JSON text
//!
//! Both enforce the lifecycle-cardinality backstop at the storage layer —
//! SQLite through unique indexes, the memory store through an equivalent
//! check under its write lock — so a check-then-create race cannot produce
//! a second singleton.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
