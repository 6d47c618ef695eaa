//! The fluent entity compiler.

use crate::entity::EntityDef;
use crate::error::{CompileError, CompileResult};
use crate::level::{AccessLevel, Lifecycle};
use crate::validate;
use crate::{MAX_ENTITY_NAME_LEN, MAX_FIELD_NAME_LEN};
use std::collections::BTreeMap;
use std::collections::hash_map::{Entry, HashMap};
use tracing::warn;
use trellis_model::{FieldDef, FieldKind, SchemaNode, casing, flatten};

/// Declares an entity whose records carry no creator identity.
pub fn entity(name: impl Into<String>, nodes: Vec<SchemaNode>) -> EntityBuilder {
    EntityBuilder::new(name, nodes, false)
}

/// Declares an entity whose records always carry a creator identity.
pub fn owned_entity(name: impl Into<String>, nodes: Vec<SchemaNode>) -> EntityBuilder {
    EntityBuilder::new(name, nodes, true)
}

/// Preset: records readable and writable only by their creator.
pub fn private_entity(name: impl Into<String>, nodes: Vec<SchemaNode>) -> EntityBuilder {
    EntityBuilder::new(name, nodes, true)
        .read_level(AccessLevel::Owner)
        .write_level(AccessLevel::Owner)
}

/// Preset: publicly readable, writable by any authenticated user.
pub fn shared_entity(name: impl Into<String>, nodes: Vec<SchemaNode>) -> EntityBuilder {
    EntityBuilder::new(name, nodes, false).write_level(AccessLevel::Authenticated)
}

/// Preset: a single shared instance, managed by authenticated users.
pub fn singleton_entity(name: impl Into<String>, nodes: Vec<SchemaNode>) -> EntityBuilder {
    EntityBuilder::new(name, nodes, false)
        .read_level(AccessLevel::Authenticated)
        .write_level(AccessLevel::Authenticated)
        .lifecycle(Lifecycle::Singleton)
}

/// Fluent builder for an [`EntityDef`].
///
/// Setters are chainable and overridable any number of times; nothing is
/// checked until [`build`](Self::build), which either returns a frozen,
/// fully validated definition or a [`CompileError`]. It never coerces an
/// invalid combination into a valid one, and it has no registration side
/// effect — pass the result to a
/// [`SchemaRegistry`](crate::SchemaRegistry) explicitly.
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    name: String,
    nodes: Vec<SchemaNode>,
    owned: bool,
    read_level: AccessLevel,
    write_level: AccessLevel,
    lifecycle: Lifecycle,
}

impl EntityBuilder {
    fn new(name: impl Into<String>, nodes: Vec<SchemaNode>, owned: bool) -> Self {
        Self {
            name: name.into(),
            nodes,
            owned,
            read_level: AccessLevel::default(),
            write_level: AccessLevel::default(),
            lifecycle: Lifecycle::default(),
        }
    }

    /// Sets the level gating reads. Last call wins.
    #[must_use]
    pub fn read_level(mut self, level: AccessLevel) -> Self {
        self.read_level = level;
        self
    }

    /// Sets the level gating writes. Last call wins.
    #[must_use]
    pub fn write_level(mut self, level: AccessLevel) -> Self {
        self.write_level = level;
        self
    }

    /// Sets the cardinality policy. Last call wins.
    #[must_use]
    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Compiles the declaration into a frozen [`EntityDef`].
    pub fn build(self) -> CompileResult<EntityDef> {
        validate_entity_name(&self.name)?;

        let mut schema = BTreeMap::new();
        let mut field_order = Vec::new();
        // column → declared name, to catch post-normalization collisions
        let mut columns: HashMap<String, String> = HashMap::new();

        for field in flatten(&self.nodes) {
            validate_field_name(&self.name, &field.name)?;
            warn_on_inconsistent_bounds(&self.name, field);

            if schema.contains_key(&field.name) {
                return Err(CompileError::DuplicateField {
                    entity: self.name,
                    field: field.name.clone(),
                });
            }

            match columns.entry(casing::snake_case(&field.name)) {
                Entry::Occupied(entry) => {
                    return Err(CompileError::FieldNameCollision {
                        entity: self.name,
                        first: entry.get().clone(),
                        second: field.name.clone(),
                        column: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(field.name.clone());
                }
            }

            field_order.push(field.name.clone());
            schema.insert(field.name.clone(), field.clone());
        }

        let def = EntityDef {
            table: casing::snake_case(&self.name),
            name: self.name,
            schema,
            field_order,
            owned: self.owned,
            read_level: self.read_level,
            write_level: self.write_level,
            lifecycle: self.lifecycle,
            groups: self.nodes,
        };

        validate::validate(&def)?;

        Ok(def)
    }
}

fn validate_entity_name(name: &str) -> CompileResult<()> {
    if name.is_empty() {
        return Err(CompileError::EmptyEntityName);
    }
    if !name.is_ascii() {
        return Err(CompileError::NonAsciiEntityName {
            name: name.to_string(),
        });
    }
    if name.len() > MAX_ENTITY_NAME_LEN {
        return Err(CompileError::EntityNameTooLong {
            name: name.to_string(),
            max: MAX_ENTITY_NAME_LEN,
        });
    }

    Ok(())
}

// Inconsistent bounds compile fine (write-time validation owns enforcement)
// but no value will ever satisfy them, which is worth a note in the log.
fn warn_on_inconsistent_bounds(entity: &str, field: &FieldDef) {
    match &field.kind {
        FieldKind::String {
            min_length: Some(min),
            max_length: Some(max),
        } if min > max => {
            warn!(
                entity,
                field = field.name.as_str(),
                "minLength exceeds maxLength; no value can satisfy both"
            );
        }
        FieldKind::Number {
            min: Some(min),
            max: Some(max),
        } if min > max => {
            warn!(
                entity,
                field = field.name.as_str(),
                "min exceeds max; no value can satisfy both"
            );
        }
        _ => {}
    }
}

fn validate_field_name(entity: &str, field: &str) -> CompileResult<()> {
    if field.is_empty() {
        return Err(CompileError::EmptyFieldName {
            entity: entity.to_string(),
        });
    }
    if field.len() > MAX_FIELD_NAME_LEN {
        return Err(CompileError::FieldNameTooLong {
            entity: entity.to_string(),
            field: field.to_string(),
            max: MAX_FIELD_NAME_LEN,
        });
    }

    Ok(())
}
