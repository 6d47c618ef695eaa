//! Core type definitions shared by every Trellis subsystem.
//!
//! - [`RecordId`] — time-ordered unique identifier for stored records
//! - [`Caller`] — the identity the auth provider supplies per request
//! - [`now_millis`] — the single wall-clock source for record bookkeeping

mod caller;
mod ids;
mod time;

pub use caller::Caller;
pub use ids::RecordId;
pub use time::now_millis;
