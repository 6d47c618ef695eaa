//! Entity compilation for Trellis.
//!
//! Takes a developer's declaration — an ordered mix of fields and groups
//! plus access/lifecycle settings — and turns it into a validated, frozen
//! [`EntityDef`]:
//!
//! - [`entity`] / [`owned_entity`] and the presets ([`private_entity`],
//!   [`shared_entity`], [`singleton_entity`]) open a fluent [`EntityBuilder`]
//! - [`EntityBuilder::build`] flattens the group tree, assigns field order,
//!   rejects duplicate and colliding field names, and runs the validation
//!   engine over the access/lifecycle combination
//! - [`SchemaRegistry`] holds the compiled definitions for the lifetime of
//!   the process; registration is explicit, never a builder side effect
//!
//! Compilation is fail-fast: an invalid definition is a startup error, not
//! something to degrade around.

mod builder;
mod entity;
mod error;
mod level;
mod registry;
pub mod validate;

pub use builder::{
    EntityBuilder, entity, owned_entity, private_entity, shared_entity, singleton_entity,
};
pub use entity::EntityDef;
pub use error::{CompileError, CompileResult};
pub use level::{AccessLevel, Lifecycle};
pub use registry::SchemaRegistry;

/// Maximum length for entity names.
pub const MAX_ENTITY_NAME_LEN: usize = 64;

/// Maximum length for field names.
pub const MAX_FIELD_NAME_LEN: usize = 64;
