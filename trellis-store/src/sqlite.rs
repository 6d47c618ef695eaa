//! SQLite record store.
//!
//! One table per entity, generated from the compiled definition: four
//! bookkeeping columns (`id`, `owner_id`, `created_at`, `modified_at`) plus
//! one column per declared field, named by the central snake_case
//! conversion. Scalar kinds map to native column types; arrays and file
//! descriptors are stored as JSON text.
//!
//! Cardinality invariants are backed by unique indexes, not just the
//! gate's read-then-check: a per-user entity gets a unique index on
//! `owner_id`, a singleton gets a unique index on a constant expression so
//! the table can never hold two rows. A losing racer surfaces as
//! [`StoreError::Conflict`].

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, Row, params_from_iter};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::info;
use trellis_gate::{RecordStore, StoreError, StoreResult};
use trellis_model::{FieldDef, FieldKind, Record, casing};
use trellis_schema::{EntityDef, Lifecycle};
use trellis_types::RecordId;

/// Stores records in an embedded SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(map_sql_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(map_sql_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .expect("sqlite connection lock poisoned")
    }
}

impl RecordStore for SqliteStore {
    fn ensure_entity(&self, def: &EntityDef) -> StoreResult<()> {
        let mut columns = vec![
            "id TEXT PRIMARY KEY".to_string(),
            "owner_id TEXT".to_string(),
            "created_at INTEGER NOT NULL".to_string(),
            "modified_at INTEGER NOT NULL".to_string(),
        ];
        for field in def.fields() {
            columns.push(format!(
                "\"{}\" {}",
                column_name(field),
                column_type(field)
            ));
        }

        let conn = self.conn();
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
                def.table(),
                columns.join(", ")
            ),
            [],
        )
        .map_err(map_sql_err)?;

        match def.lifecycle() {
            Lifecycle::Default => {}
            Lifecycle::InstancePerUser => {
                conn.execute(
                    &format!(
                        "CREATE UNIQUE INDEX IF NOT EXISTS \"idx_{0}_owner\" ON \"{0}\"(owner_id)",
                        def.table()
                    ),
                    [],
                )
                .map_err(map_sql_err)?;
            }
            Lifecycle::Singleton => {
                // unique over a constant expression: at most one row, ever
                conn.execute(
                    &format!(
                        "CREATE UNIQUE INDEX IF NOT EXISTS \"idx_{0}_singleton\" ON \"{0}\"((id IS NOT NULL))",
                        def.table()
                    ),
                    [],
                )
                .map_err(map_sql_err)?;
            }
        }

        info!(table = def.table(), entity = def.name(), "ensured entity table");
        Ok(())
    }

    fn insert(&self, def: &EntityDef, record: &Record) -> StoreResult<()> {
        let mut columns = vec!["id", "owner_id", "created_at", "modified_at"]
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut params = vec![
            SqlValue::Text(record.id.to_string()),
            owner_param(record.owner.as_deref()),
            SqlValue::Integer(record.created_at),
            SqlValue::Integer(record.modified_at),
        ];
        for field in def.fields() {
            columns.push(format!("\"{}\"", column_name(field)));
            params.push(to_sql_value(field, record.data.get(&field.name))?);
        }

        let placeholders = (1..=params.len())
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");

        self.conn()
            .execute(
                &format!(
                    "INSERT INTO \"{}\" ({}) VALUES ({})",
                    def.table(),
                    columns.join(", "),
                    placeholders
                ),
                params_from_iter(params),
            )
            .map_err(map_sql_err)?;
        Ok(())
    }

    fn get(&self, def: &EntityDef, id: RecordId) -> StoreResult<Option<Record>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM \"{}\" WHERE id = ?1",
                select_columns(def),
                def.table()
            ))
            .map_err(map_sql_err)?;
        let mut rows = stmt
            .query([id.to_string()])
            .map_err(map_sql_err)?;

        match rows.next().map_err(map_sql_err)? {
            Some(row) => Ok(Some(record_from_row(def, row)?)),
            None => Ok(None),
        }
    }

    fn list(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<Vec<Record>> {
        let conn = self.conn();
        let base = format!(
            "SELECT {} FROM \"{}\"",
            select_columns(def),
            def.table()
        );
        let sql = match owner {
            Some(_) => format!("{base} WHERE owner_id = ?1 ORDER BY created_at, id"),
            None => format!("{base} ORDER BY created_at, id"),
        };

        let mut stmt = conn.prepare(&sql).map_err(map_sql_err)?;
        let mut rows = match owner {
            Some(owner) => stmt.query([owner]).map_err(map_sql_err)?,
            None => stmt.query([]).map_err(map_sql_err)?,
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sql_err)? {
            out.push(record_from_row(def, row)?);
        }
        Ok(out)
    }

    fn update(&self, def: &EntityDef, record: &Record) -> StoreResult<()> {
        let mut assignments = vec!["modified_at = ?1".to_string()];
        let mut params = vec![SqlValue::Integer(record.modified_at)];
        for field in def.fields() {
            params.push(to_sql_value(field, record.data.get(&field.name))?);
            assignments.push(format!("\"{}\" = ?{}", column_name(field), params.len()));
        }
        params.push(SqlValue::Text(record.id.to_string()));
        let id_slot = params.len();

        let affected = self
            .conn()
            .execute(
                &format!(
                    "UPDATE \"{}\" SET {} WHERE id = ?{id_slot}",
                    def.table(),
                    assignments.join(", ")
                ),
                params_from_iter(params),
            )
            .map_err(map_sql_err)?;

        if affected == 0 {
            return Err(StoreError::NotFound(format!(
                "{}/{}",
                def.table(),
                record.id
            )));
        }
        Ok(())
    }

    fn delete(&self, def: &EntityDef, id: RecordId) -> StoreResult<bool> {
        let affected = self
            .conn()
            .execute(
                &format!("DELETE FROM \"{}\" WHERE id = ?1", def.table()),
                [id.to_string()],
            )
            .map_err(map_sql_err)?;
        Ok(affected > 0)
    }

    fn count(&self, def: &EntityDef, owner: Option<&str>) -> StoreResult<u64> {
        let conn = self.conn();
        let count: i64 = match owner {
            Some(owner) => conn
                .query_row(
                    &format!(
                        "SELECT COUNT(*) FROM \"{}\" WHERE owner_id = ?1",
                        def.table()
                    ),
                    [owner],
                    |row| row.get(0),
                )
                .map_err(map_sql_err)?,
            None => conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM \"{}\"", def.table()),
                    [],
                    |row| row.get(0),
                )
                .map_err(map_sql_err)?,
        };
        Ok(count as u64)
    }
}

fn column_name(field: &FieldDef) -> String {
    casing::snake_case(&field.name)
}

fn column_type(field: &FieldDef) -> &'static str {
    if field.is_array {
        return "TEXT";
    }
    match field.kind {
        FieldKind::String { .. }
        | FieldKind::Date
        | FieldKind::Enum { .. }
        | FieldKind::RichText
        | FieldKind::File { .. } => "TEXT",
        FieldKind::Number { .. } => "REAL",
        FieldKind::Boolean => "INTEGER",
    }
}

fn select_columns(def: &EntityDef) -> String {
    let mut columns = vec![
        "id".to_string(),
        "owner_id".to_string(),
        "created_at".to_string(),
        "modified_at".to_string(),
    ];
    for field in def.fields() {
        columns.push(format!("\"{}\"", column_name(field)));
    }
    columns.join(", ")
}

fn owner_param(owner: Option<&str>) -> SqlValue {
    match owner {
        Some(owner) => SqlValue::Text(owner.to_string()),
        None => SqlValue::Null,
    }
}

// JSON value → SQL parameter, driven by the field's declared kind.
fn to_sql_value(field: &FieldDef, value: Option<&Value>) -> StoreResult<SqlValue> {
    let Some(value) = value else {
        return Ok(SqlValue::Null);
    };
    if value.is_null() {
        return Ok(SqlValue::Null);
    }
    if field.is_array {
        return Ok(SqlValue::Text(serde_json::to_string(value)?));
    }

    Ok(match &field.kind {
        FieldKind::String { .. }
        | FieldKind::Date
        | FieldKind::Enum { .. }
        | FieldKind::RichText => match value.as_str() {
            Some(text) => SqlValue::Text(text.to_string()),
            None => SqlValue::Text(serde_json::to_string(value)?),
        },
        FieldKind::Number { .. } => match value.as_f64() {
            Some(n) => SqlValue::Real(n),
            None => SqlValue::Text(serde_json::to_string(value)?),
        },
        FieldKind::Boolean => match value.as_bool() {
            Some(b) => SqlValue::Integer(b.into()),
            None => SqlValue::Text(serde_json::to_string(value)?),
        },
        FieldKind::File { .. } => SqlValue::Text(serde_json::to_string(value)?),
    })
}

// SQL column → JSON value; None means the field was absent/null.
fn from_sql_value(field: &FieldDef, value: SqlValue) -> StoreResult<Option<Value>> {
    Ok(match value {
        SqlValue::Null => None,
        SqlValue::Text(text) => {
            if field.is_array || matches!(field.kind, FieldKind::File { .. }) {
                Some(serde_json::from_str(&text)?)
            } else {
                Some(Value::String(text))
            }
        }
        SqlValue::Real(n) => Some(Value::from(n)),
        SqlValue::Integer(i) => Some(match field.kind {
            FieldKind::Boolean => Value::Bool(i != 0),
            _ => Value::from(i),
        }),
        SqlValue::Blob(_) => {
            return Err(StoreError::Backend(format!(
                "unexpected blob in column '{}'",
                column_name(field)
            )));
        }
    })
}

fn record_from_row(def: &EntityDef, row: &Row<'_>) -> StoreResult<Record> {
    let id: String = row.get(0).map_err(map_sql_err)?;
    let owner: Option<String> = row.get(1).map_err(map_sql_err)?;
    let created_at: i64 = row.get(2).map_err(map_sql_err)?;
    let modified_at: i64 = row.get(3).map_err(map_sql_err)?;

    let mut data = Map::new();
    for (idx, field) in def.fields().enumerate() {
        let value: SqlValue = row.get(4 + idx).map_err(map_sql_err)?;
        if let Some(value) = from_sql_value(field, value)? {
            data.insert(field.name.clone(), value);
        }
    }

    Ok(Record {
        id: RecordId::parse(&id)
            .map_err(|err| StoreError::Backend(format!("corrupt record id '{id}': {err}")))?,
        entity: def.name().to_string(),
        data,
        created_at,
        modified_at,
        owner,
    })
}

fn map_sql_err(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict(
                message
                    .clone()
                    .unwrap_or_else(|| "constraint violation".to_string()),
            )
        }
        _ => StoreError::Backend(err.to_string()),
    }
}
