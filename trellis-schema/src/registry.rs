//! The process-wide schema registry.
//!
//! An explicit context object, constructed once at application startup and
//! handed to whatever needs entity lookup (the storage adapter, the API
//! router). There is deliberately no global instance — parallel test suites
//! and embedded apps each own their registry.

use crate::entity::EntityDef;
use crate::error::{CompileError, CompileResult};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Holds compiled entity definitions for the lifetime of the process.
///
/// Strict by default: registering a name twice is a
/// [`CompileError::DuplicateEntity`]. The [`permissive`](Self::permissive)
/// mode switches to last-write-wins redefinition, for hot-reload and test
/// flows that rebuild entities in place.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entities: RwLock<BTreeMap<String, Arc<EntityDef>>>,
    allow_redefinition: bool,
}

impl SchemaRegistry {
    /// A strict registry: duplicate names are a startup error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that silently replaces redefined entities.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            allow_redefinition: true,
        }
    }

    /// Registers a compiled definition under its entity name.
    ///
    /// Rejects duplicate names (unless permissive) and distinct names whose
    /// storage tables collide after normalization.
    pub fn register(&self, def: EntityDef) -> CompileResult<Arc<EntityDef>> {
        let def = Arc::new(def);
        let mut entities = self.write();

        if !self.allow_redefinition && entities.contains_key(def.name()) {
            return Err(CompileError::DuplicateEntity {
                name: def.name().to_string(),
            });
        }

        for other in entities.values() {
            if other.name() != def.name() && other.table() == def.table() {
                return Err(CompileError::TableCollision {
                    first: other.name().to_string(),
                    second: def.name().to_string(),
                    table: def.table().to_string(),
                });
            }
        }

        let replaced = entities
            .insert(def.name().to_string(), Arc::clone(&def))
            .is_some();
        if replaced {
            debug!(entity = def.name(), "replaced registered entity definition");
        } else {
            info!(entity = def.name(), table = def.table(), "registered entity");
        }

        Ok(def)
    }

    /// Looks up a definition by entity name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<EntityDef>> {
        self.read().get(name).cloned()
    }

    /// Registered entity names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes every registered definition. Test-suite convenience only;
    /// production registries live as long as the process.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<EntityDef>>> {
        self.entities
            .read()
            .expect("schema registry lock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<EntityDef>>> {
        self.entities
            .write()
            .expect("schema registry lock poisoned while acquiring write lock")
    }
}
