//! Runtime counterpart of the entity compiler.
//!
//! The compiler proves an entity's access/lifecycle combination coherent;
//! this crate enforces the same rules per request:
//!
//! - [`authorize`] — the pure decision function over
//!   (level, operation, caller, record owner)
//! - [`Repository`] — CRUD over any [`RecordStore`], combining the access
//!   decision with lifecycle-cardinality checks and write-time value
//!   validation
//! - [`GateError`] — keeps denial, conflict, not-found, and invalid-value
//!   outcomes distinct so the HTTP layer can map them to distinct statuses
//!
//! Denials that depend on a record's owner are reported as [`GateError::NotFound`]
//! so a denied caller cannot probe which ids exist.

mod authorize;
mod error;
mod repository;
mod store;
mod values;

pub use authorize::{Access, Operation, authorize};
pub use error::{GateError, GateResult};
pub use repository::Repository;
pub use store::{RecordStore, StoreError, StoreResult};
