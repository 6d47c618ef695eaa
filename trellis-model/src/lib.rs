//! Field and layout model for Trellis.
//!
//! Defines the value types a developer assembles when declaring an entity:
//! - [`FieldDef`] and the typed chainable builders ([`string`], [`number`],
//!   [`date`], [`enumeration`], [`richtext`], [`file`], [`boolean`])
//! - [`FieldGroup`] / [`SchemaNode`] — the layout tree and its flattening
//! - [`Record`] — the generic runtime data container
//! - [`casing`] — the single camelCase/snake_case conversion authority
//!
//! Builders are immutable: every mutator returns a new value and leaves the
//! receiver untouched, so a partially configured field can be reused across
//! several chains without state leaking between them. Builders never fail;
//! inconsistent constraint values are stored as given and surface at
//! write-time validation.

pub mod casing;
mod field;
mod group;
mod record;
mod ui;

pub use field::{
    BooleanField, DateField, EnumField, FieldDef, FieldKind, FileField, NumberField,
    RichTextField, StringField, boolean, date, enumeration, file, number, richtext, string,
};
pub use group::{FieldGroup, GroupLabel, SchemaNode, flatten, group, hgroup};
pub use record::Record;
pub use ui::{Align, UiMetadata};
