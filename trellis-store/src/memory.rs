//! In-memory record store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use trellis_gate::{RecordStore, StoreError, StoreResult};
use trellis_model::Record;
use trellis_schema::{EntityDef, Lifecycle};
use trellis_types::RecordId;

type Table = BTreeMap<RecordId, Record>;

/// Keeps every record in process memory, one ordered table per entity.
///
/// Listing order follows record ids, which are time-ordered by
/// construction. The cardinality backstop runs under the write lock, so two
/// racing inserts of a singleton cannot both land — the same guarantee the
/// SQLite adapter gets from its unique indexes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Table>> {
        self.tables
            .read()
            .expect("memory store lock poisoned while acquiring read lock")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Table>> {
        self.tables
            .write()
            .expect("memory store lock poisoned while acquiring write lock")
    }
}

impl RecordStore for MemoryStore {
    fn ensure_entity(&self, def: &EntityDef) -> StoreResult<()> {
        self.write().entry(def.table().to_string()).or_default();
        Ok(())
    }

    fn insert(&self, def: &EntityDef, record: &Record) -> StoreResult<()> {
        let mut tables = self.write();
        let table = tables.entry(def.table().to_string()).or_default();

        // cardinality backstop, equivalent to the SQL unique indexes
        match def.lifecycle() {
            Lifecycle::Singleton if !table.is_empty() => {
                return Err(StoreError::Conflict(format!(
                    "singleton table '{}' already holds a record",
                    def.table()
                )));
            }
            Lifecycle::InstancePerUser
                if table.values().any(|existing| existing.owner == record.owner) =>
            {
                return Err(StoreError::Conflict(format!(
                    "table '{}' already holds a record for this owner",
                    def.table()
                )));
            }
            _ => {}
        }

        table.insert(record.id, record.clone());
        Ok(())
    }

    fn get(&self, def: &EntityDef, id: RecordId) -> StoreResult<Option<Record>> {
        Ok(self
            .read()
            .get(def.table())
            .and_then(|table| table.get(&id))
            .cloned())
    }

    fn list(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<Vec<Record>> {
        Ok(self
            .read()
            .get(def.table())
            .map(|table| {
                table
                    .values()
                    .filter(|record| owner.is_none() || record.owner.as_deref() == owner)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn update(&self, def: &EntityDef, record: &Record) -> StoreResult<()> {
        let mut tables = self.write();
        let table = tables
            .get_mut(def.table())
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", def.table(), record.id)))?;

        if !table.contains_key(&record.id) {
            return Err(StoreError::NotFound(format!(
                "{}/{}",
                def.table(),
                record.id
            )));
        }
        table.insert(record.id, record.clone());
        Ok(())
    }

    fn delete(&self, def: &EntityDef, id: RecordId) -> StoreResult<bool> {
        Ok(self
            .write()
            .get_mut(def.table())
            .is_some_and(|table| table.remove(&id).is_some()))
    }

    fn count(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<u64> {
        Ok(self
            .read()
            .get(def.table())
            .map(|table| {
                table
                    .values()
                    .filter(|record| owner.is_none() || record.owner.as_deref() == owner)
                    .count() as u64
            })
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_model::{fields, string};
    use trellis_schema::{entity, singleton_entity};

    fn record(def: &EntityDef, body: &str, owner: Option<&str>) -> Record {
        let data = match json!({"body": body}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Record::new(def.name(), data, owner.map(str::to_string))
    }

    #[test]
    fn insert_get_roundtrip() {
        let store = MemoryStore::new();
        let def = entity("Note", fields![string("body")]).build().unwrap();
        let r = record(&def, "hi", None);

        store.insert(&def, &r).unwrap();
        assert_eq!(store.get(&def, r.id).unwrap(), Some(r));
    }

    #[test]
    fn singleton_backstop_rejects_second_insert() {
        let store = MemoryStore::new();
        let def = singleton_entity("Settings", fields![string("body")])
            .build()
            .unwrap();

        store
            .insert(&def, &record(&def, "one", Some("alice")))
            .unwrap();
        let err = store
            .insert(&def, &record(&def, "two", Some("bob")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn update_of_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let def = entity("Note", fields![string("body")]).build().unwrap();
        let err = store.update(&def, &record(&def, "x", None)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn owner_filter_on_list_and_count() {
        let store = MemoryStore::new();
        let def = entity("Note", fields![string("body")]).build().unwrap();
        store
            .insert(&def, &record(&def, "a", Some("alice")))
            .unwrap();
        store
            .insert(&def, &record(&def, "b", Some("bob")))
            .unwrap();

        assert_eq!(store.list(&def, None).unwrap().len(), 2);
        assert_eq!(store.list(&def, Some("alice")).unwrap().len(), 1);
        assert_eq!(store.count(&def, Some("bob")).unwrap(), 1);
        assert_eq!(store.count(&def, Some("nobody")).unwrap(), 0);
    }
}
