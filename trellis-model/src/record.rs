//! The generic runtime data container.
//!
//! All entity data flows through [`Record`]. The `data` map holds one JSON
//! value per declared field, keyed by field name; the surrounding bookkeeping
//! (id, timestamps, owner) is managed by the repository gate, never by
//! callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use trellis_types::{RecordId, now_millis};

/// One stored instance of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    /// The entity name this record belongs to.
    pub entity: String,
    /// Field name → JSON value, per the entity's schema.
    pub data: Map<String, Value>,
    pub created_at: i64,
    pub modified_at: i64,
    /// Creator identity, present when the entity definition requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Record {
    /// Creates a fresh record with a new id and current timestamps.
    #[must_use]
    pub fn new(entity: impl Into<String>, data: Map<String, Value>, owner: Option<String>) -> Self {
        let now = now_millis();
        Self {
            id: RecordId::new(),
            entity: entity.into(),
            data,
            created_at: now,
            modified_at: now,
            owner,
        }
    }

    /// A string field value, if present and a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// A boolean field value, if present and a boolean.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.data.get(field).and_then(Value::as_bool)
    }

    /// A numeric field value, if present and numeric.
    #[must_use]
    pub fn get_number(&self, field: &str) -> Option<f64> {
        self.data.get(field).and_then(Value::as_f64)
    }
}
