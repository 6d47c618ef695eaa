//! A minimal in-memory store for exercising the repository gate.

use std::collections::BTreeMap;
use std::sync::RwLock;
use trellis_gate::{RecordStore, StoreResult};
use trellis_model::Record;
use trellis_schema::EntityDef;
use trellis_types::RecordId;

#[derive(Default)]
pub struct TestStore {
    records: RwLock<BTreeMap<(String, RecordId), Record>>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for TestStore {
    fn ensure_entity(&self, _def: &EntityDef) -> StoreResult<()> {
        Ok(())
    }

    fn insert(&self, def: &EntityDef, record: &Record) -> StoreResult<()> {
        self.records
            .write()
            .unwrap()
            .insert((def.table().to_string(), record.id), record.clone());
        Ok(())
    }

    fn get(&self, def: &EntityDef, id: RecordId) -> StoreResult<Option<Record>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .get(&(def.table().to_string(), id))
            .cloned())
    }

    fn list(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|((table, _), _)| table == def.table())
            .map(|(_, record)| record)
            .filter(|record| owner.is_none() || record.owner.as_deref() == owner)
            .cloned()
            .collect())
    }

    fn update(&self, def: &EntityDef, record: &Record) -> StoreResult<()> {
        self.records
            .write()
            .unwrap()
            .insert((def.table().to_string(), record.id), record.clone());
        Ok(())
    }

    fn delete(&self, def: &EntityDef, id: RecordId) -> StoreResult<bool> {
        Ok(self
            .records
            .write()
            .unwrap()
            .remove(&(def.table().to_string(), id))
            .is_some())
    }

    fn count(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<u64> {
        Ok(self.list(def, owner)?.len() as u64)
    }
}
