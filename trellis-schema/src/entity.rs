//! The compiled entity definition.

use crate::level::{AccessLevel, Lifecycle};
use serde::Serialize;
use std::collections::BTreeMap;
use trellis_model::{FieldDef, SchemaNode};

/// The compiled, validated, immutable description of one record type.
///
/// Produced only by [`EntityBuilder::build`](crate::EntityBuilder::build) —
/// if you hold one, its invariants hold: `field_order` is a permutation of
/// the schema keys, the table name is the deterministic snake_case of the
/// entity name, and the access/lifecycle combination passed the validation
/// engine. Serializes (one way) for the UI renderer; it is never
/// deserialized back, so no unvalidated instance can exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDef {
    pub(crate) name: String,
    pub(crate) table: String,
    pub(crate) schema: BTreeMap<String, FieldDef>,
    pub(crate) field_order: Vec<String>,
    pub(crate) owned: bool,
    pub(crate) read_level: AccessLevel,
    pub(crate) write_level: AccessLevel,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) groups: Vec<SchemaNode>,
}

impl EntityDef {
    /// The declared entity name, unique within a registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The storage table name — snake_case of the entity name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether every record must carry a creator identity.
    #[must_use]
    pub const fn owned(&self) -> bool {
        self.owned
    }

    #[must_use]
    pub const fn read_level(&self) -> AccessLevel {
        self.read_level
    }

    #[must_use]
    pub const fn write_level(&self) -> AccessLevel {
        self.write_level
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Field names in declaration order (depth-first through groups).
    #[must_use]
    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    /// Looks up one field definition by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.schema.get(name)
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.field_order.iter().filter_map(|name| self.schema.get(name))
    }

    /// Number of declared fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.field_order.len()
    }

    /// The original (unflattened) declaration tree, for UI layout.
    #[must_use]
    pub fn groups(&self) -> &[SchemaNode] {
        &self.groups
    }

    /// Whether records of this entity must carry an `owner` at creation.
    ///
    /// True when the entity is owned, keeps one instance per user, or gates
    /// either operation at owner level — in every one of those cases the
    /// gate has to know who created the record.
    #[must_use]
    pub const fn requires_owner(&self) -> bool {
        self.owned
            || matches!(self.lifecycle, Lifecycle::InstancePerUser)
            || matches!(self.read_level, AccessLevel::Owner)
            || matches!(self.write_level, AccessLevel::Owner)
    }
}
