//! The repository gate — CRUD with access, lifecycle, and value enforcement.

use crate::authorize::{Access, Operation, authorize};
use crate::error::{GateError, GateResult};
use crate::store::{RecordStore, StoreError};
use crate::values::{apply_defaults, check_values};
use serde_json::{Map, Value};
use tracing::debug;
use trellis_model::Record;
use trellis_schema::{AccessLevel, EntityDef, Lifecycle};
use trellis_types::{Caller, RecordId, now_millis};

/// Gated CRUD over a [`RecordStore`].
///
/// Every method takes the compiled definition and the caller identity; the
/// store itself never sees either decision. Denials that depend on a
/// record's stored owner surface as [`GateError::NotFound`] so a denied
/// caller cannot probe which ids exist; blanket denials (the level excludes
/// the caller regardless of any record) surface as
/// [`GateError::AccessDenied`].
pub struct Repository<S> {
    store: S,
}

impl<S: RecordStore> Repository<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store, for adapter-level setup such as
    /// [`ensure_entity`](RecordStore::ensure_entity).
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Creates a record from caller-submitted field values.
    pub fn create(
        &self,
        def: &EntityDef,
        caller: &Caller,
        data: Map<String, Value>,
    ) -> GateResult<Record> {
        if authorize(def, Operation::Create, caller, None) == Access::Denied {
            debug!(entity = def.name(), "create denied");
            return Err(GateError::denied(def.name(), Operation::Create));
        }

        let owner = caller.username().map(str::to_string);
        if def.requires_owner() && owner.is_none() {
            // owned means every record carries a creator identity; an
            // anonymous caller cannot supply one
            debug!(entity = def.name(), "create denied: owner required");
            return Err(GateError::denied(def.name(), Operation::Create));
        }

        self.check_cardinality(def, owner.as_deref())?;

        let mut data = data;
        apply_defaults(def, &mut data);
        check_values(def, &data, false)?;

        let record = Record::new(def.name(), data, owner);
        match self.store.insert(def, &record) {
            Ok(()) => Ok(record),
            // the storage-level uniqueness backstop lost us the race
            Err(StoreError::Conflict(reason)) => {
                debug!(entity = def.name(), %reason, "create lost cardinality race");
                Err(GateError::conflict(def.name(), reason))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists records the caller may see, oldest first.
    pub fn list(&self, def: &EntityDef, caller: &Caller) -> GateResult<Vec<Record>> {
        match authorize(def, Operation::ReadList, caller, None) {
            Access::Granted => Ok(self.store.list(def, None)?),
            Access::OwnerScoped => Ok(self.store.list(def, caller.username())?),
            Access::Denied => {
                debug!(entity = def.name(), "list denied");
                Err(GateError::denied(def.name(), Operation::ReadList))
            }
        }
    }

    /// Fetches one record by id.
    pub fn get(&self, def: &EntityDef, caller: &Caller, id: RecordId) -> GateResult<Record> {
        self.blanket_check(def, Operation::ReadOne, caller)?;

        let record = self
            .store
            .get(def, id)?
            .ok_or_else(|| GateError::not_found(def.name(), id))?;

        match authorize(def, Operation::ReadOne, caller, record.owner.as_deref()) {
            Access::Denied => {
                debug!(entity = def.name(), %id, "owner mismatch on get, hiding record");
                Err(GateError::not_found(def.name(), id))
            }
            _ => Ok(record),
        }
    }

    /// Merges caller-submitted changes into an existing record.
    pub fn update(
        &self,
        def: &EntityDef,
        caller: &Caller,
        id: RecordId,
        changes: Map<String, Value>,
    ) -> GateResult<Record> {
        self.blanket_check(def, Operation::Update, caller)?;

        let mut record = self
            .store
            .get(def, id)?
            .ok_or_else(|| GateError::not_found(def.name(), id))?;

        if authorize(def, Operation::Update, caller, record.owner.as_deref()) == Access::Denied {
            debug!(entity = def.name(), %id, "owner mismatch on update, hiding record");
            return Err(GateError::not_found(def.name(), id));
        }

        check_values(def, &changes, true)?;

        for (name, value) in changes {
            record.data.insert(name, value);
        }
        record.modified_at = now_millis();

        self.store.update(def, &record)?;
        Ok(record)
    }

    /// Deletes one record by id.
    pub fn delete(&self, def: &EntityDef, caller: &Caller, id: RecordId) -> GateResult<()> {
        self.blanket_check(def, Operation::Delete, caller)?;

        let record = self
            .store
            .get(def, id)?
            .ok_or_else(|| GateError::not_found(def.name(), id))?;

        if authorize(def, Operation::Delete, caller, record.owner.as_deref()) == Access::Denied {
            debug!(entity = def.name(), %id, "owner mismatch on delete, hiding record");
            return Err(GateError::not_found(def.name(), id));
        }

        if !self.store.delete(def, id)? {
            return Err(GateError::not_found(def.name(), id));
        }
        Ok(())
    }

    // Denials that need no record: the level excludes the caller outright.
    // Reported as AccessDenied — they reveal nothing about any record.
    fn blanket_check(&self, def: &EntityDef, op: Operation, caller: &Caller) -> GateResult<()> {
        let level = if op.is_read() {
            def.read_level()
        } else {
            def.write_level()
        };
        let excluded = match level {
            AccessLevel::Unauthenticated => false,
            AccessLevel::Authenticated | AccessLevel::Owner => !caller.is_authenticated(),
        };
        if excluded {
            debug!(entity = def.name(), operation = %op, "blanket denial");
            return Err(GateError::denied(def.name(), op));
        }
        Ok(())
    }

    // The check half of check-then-create; the storage unique index is the
    // enforce half under concurrency.
    fn check_cardinality(&self, def: &EntityDef, owner: Option<&str>) -> GateResult<()> {
        match def.lifecycle() {
            Lifecycle::Default => Ok(()),
            Lifecycle::Singleton => {
                if self.store.count(def, None)? > 0 {
                    debug!(entity = def.name(), "singleton instance already exists");
                    Err(GateError::conflict(
                        def.name(),
                        "singleton instance already exists",
                    ))
                } else {
                    Ok(())
                }
            }
            Lifecycle::InstancePerUser => {
                // requires_owner() guarantees an owner by the time we get here
                if self.store.count(def, owner)? > 0 {
                    debug!(entity = def.name(), ?owner, "per-user instance already exists");
                    Err(GateError::conflict(
                        def.name(),
                        "an instance already exists for this user",
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}
