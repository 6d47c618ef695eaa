//! Write-time value validation against compiled field constraints.
//!
//! The builders store constraints without judging them; this module is
//! where they bite. Checks run on every create (full) and update (partial —
//! only submitted fields are examined).

use crate::error::{GateError, GateResult};
use serde_json::{Map, Value};
use trellis_model::{FieldDef, FieldKind};
use trellis_schema::EntityDef;

/// Fills declared defaults into fields the caller omitted.
pub(crate) fn apply_defaults(def: &EntityDef, data: &mut Map<String, Value>) {
    for field in def.fields() {
        if let Some(default) = &field.default {
            if !data.contains_key(&field.name) {
                data.insert(field.name.clone(), default.clone());
            }
        }
    }
}

/// Checks submitted values against the entity's schema.
///
/// `partial` relaxes the required-field presence check for updates; a
/// required field explicitly set to null still fails.
pub(crate) fn check_values(
    def: &EntityDef,
    data: &Map<String, Value>,
    partial: bool,
) -> GateResult<()> {
    for (name, value) in data {
        let Some(field) = def.field(name) else {
            return Err(GateError::invalid(name, "field is not declared"));
        };
        check_field(field, value, partial)?;
    }

    if !partial {
        for field in def.fields() {
            if field.is_required && data.get(&field.name).is_none_or(Value::is_null) {
                return Err(GateError::invalid(&field.name, "required field is missing"));
            }
        }
    }

    Ok(())
}

fn check_field(field: &FieldDef, value: &Value, partial: bool) -> GateResult<()> {
    if value.is_null() {
        if field.is_required && partial {
            return Err(GateError::invalid(
                &field.name,
                "required field cannot be set to null",
            ));
        }
        return Ok(());
    }

    if field.is_array {
        let Some(items) = value.as_array() else {
            return Err(GateError::invalid(&field.name, "expected an array"));
        };
        for item in items {
            check_scalar(field, item)?;
        }
        return Ok(());
    }

    check_scalar(field, value)
}

fn check_scalar(field: &FieldDef, value: &Value) -> GateResult<()> {
    match &field.kind {
        FieldKind::String {
            min_length,
            max_length,
        } => {
            let Some(text) = value.as_str() else {
                return Err(GateError::invalid(&field.name, "expected a string"));
            };
            let len = text.chars().count();
            if let Some(min) = min_length {
                if len < *min {
                    return Err(GateError::invalid(
                        &field.name,
                        format!("shorter than minimum length {min}"),
                    ));
                }
            }
            if let Some(max) = max_length {
                if len > *max {
                    return Err(GateError::invalid(
                        &field.name,
                        format!("longer than maximum length {max}"),
                    ));
                }
            }
        }
        FieldKind::Number { min, max } => {
            let Some(n) = value.as_f64() else {
                return Err(GateError::invalid(&field.name, "expected a number"));
            };
            if !n.is_finite() {
                return Err(GateError::invalid(&field.name, "number must be finite"));
            }
            if let Some(min) = min {
                if n < *min {
                    return Err(GateError::invalid(
                        &field.name,
                        format!("below minimum {min}"),
                    ));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(GateError::invalid(
                        &field.name,
                        format!("above maximum {max}"),
                    ));
                }
            }
        }
        FieldKind::Date => {
            let Some(text) = value.as_str() else {
                return Err(GateError::invalid(&field.name, "expected a date string"));
            };
            if !is_iso_date(text) {
                return Err(GateError::invalid(
                    &field.name,
                    "expected an ISO-8601 date (YYYY-MM-DD)",
                ));
            }
        }
        FieldKind::Enum { values } => {
            let Some(text) = value.as_str() else {
                return Err(GateError::invalid(&field.name, "expected a string"));
            };
            if !values.iter().any(|v| v == text) {
                return Err(GateError::invalid(
                    &field.name,
                    format!("'{text}' is not one of the allowed values"),
                ));
            }
        }
        FieldKind::RichText => {
            if !value.is_string() {
                return Err(GateError::invalid(&field.name, "expected a string"));
            }
        }
        FieldKind::File {
            max_size,
            allowed_types,
        } => check_file(field, value, *max_size, allowed_types)?,
        FieldKind::Boolean => {
            if !value.is_boolean() {
                return Err(GateError::invalid(&field.name, "expected a boolean"));
            }
        }
    }

    Ok(())
}

// A file value is a descriptor object: { "name", "size", "contentType", … }.
fn check_file(
    field: &FieldDef,
    value: &Value,
    max_size: Option<u64>,
    allowed_types: &[String],
) -> GateResult<()> {
    let Some(descriptor) = value.as_object() else {
        return Err(GateError::invalid(&field.name, "expected a file descriptor"));
    };

    if let Some(max) = max_size {
        if let Some(size) = descriptor.get("size").and_then(Value::as_u64) {
            if size > max {
                return Err(GateError::invalid(
                    &field.name,
                    format!("file exceeds maximum size {max} bytes"),
                ));
            }
        }
    }

    if !allowed_types.is_empty() {
        let content_type = descriptor
            .get("contentType")
            .and_then(Value::as_str)
            .unwrap_or("");
        if !allowed_types.iter().any(|t| t == content_type) {
            return Err(GateError::invalid(
                &field.name,
                format!("content type '{content_type}' is not allowed"),
            ));
        }
    }

    Ok(())
}

fn is_iso_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| {
        bytes[range].iter().all(u8::is_ascii_digit)
    };
    if !digits(0..4) || !digits(5..7) || !digits(8..10) {
        return false;
    }
    let month: u8 = text[5..7].parse().unwrap_or(0);
    let day: u8 = text[8..10].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}
