//! Typed field definitions and their chainable builders.
//!
//! Each factory (`string`, `number`, `date`, `enumeration`, `richtext`,
//! `file`, `boolean`) returns a typed builder wrapping a [`FieldDef`].
//! Mutators take `&self` and return a fresh value — the receiver is never
//! mutated. Builders store constraint values without judging them; a
//! `min_length` greater than `max_length` compiles fine and is caught when
//! data is actually written.

use crate::ui::{Align, UiMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type of a field, with its type-specific constraints inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldKind {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Date,
    Enum {
        values: Vec<String>,
    },
    RichText,
    File {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_size: Option<u64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        allowed_types: Vec<String>,
    },
    Boolean,
}

impl FieldKind {
    /// The wire name of this kind, matching the serde tag.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Date => "date",
            Self::Enum { .. } => "enum",
            Self::RichText => "richText",
            Self::File { .. } => "file",
            Self::Boolean => "boolean",
        }
    }
}

/// One typed, named attribute of an entity — the compiled form every
/// builder ultimately produces. Immutable once attached to an entity
/// declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "UiMetadata::is_empty")]
    pub ui: UiMetadata,
}

impl FieldDef {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_required: false,
            is_array: false,
            default: None,
            ui: UiMetadata::default(),
        }
    }
}

/// A string attribute. `min_length`/`max_length` bound the value at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct StringField(FieldDef);

/// A numeric attribute. `min`/`max` bound the value at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberField(FieldDef);

/// A calendar-date attribute, carried as an ISO-8601 string.
#[derive(Debug, Clone, PartialEq)]
pub struct DateField(FieldDef);

/// An attribute restricted to a fixed set of string values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumField(FieldDef);

/// A formatted-text attribute; stored as markup, rendered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct RichTextField(FieldDef);

/// A file-reference attribute with optional size/content-type limits.
#[derive(Debug, Clone, PartialEq)]
pub struct FileField(FieldDef);

/// A true/false attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanField(FieldDef);

pub fn string(name: impl Into<String>) -> StringField {
    StringField(FieldDef::new(
        name,
        FieldKind::String {
            min_length: None,
            max_length: None,
        },
    ))
}

pub fn number(name: impl Into<String>) -> NumberField {
    NumberField(FieldDef::new(
        name,
        FieldKind::Number {
            min: None,
            max: None,
        },
    ))
}

pub fn date(name: impl Into<String>) -> DateField {
    DateField(FieldDef::new(name, FieldKind::Date))
}

pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> EnumField
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumField(FieldDef::new(
        name,
        FieldKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        },
    ))
}

pub fn richtext(name: impl Into<String>) -> RichTextField {
    RichTextField(FieldDef::new(name, FieldKind::RichText))
}

pub fn file(name: impl Into<String>) -> FileField {
    FileField(FieldDef::new(
        name,
        FieldKind::File {
            max_size: None,
            allowed_types: Vec::new(),
        },
    ))
}

pub fn boolean(name: impl Into<String>) -> BooleanField {
    BooleanField(FieldDef::new(name, FieldKind::Boolean))
}

// The chainable surface shared by every builder. Each mutator clones the
// wrapped definition, applies one change, and wraps the result.
macro_rules! impl_common_mutators {
    ($($builder:ident),+ $(,)?) => {$(
        impl $builder {
            /// The wrapped definition, for inspection.
            #[must_use]
            pub fn def(&self) -> &FieldDef {
                &self.0
            }

            /// Requires a non-null value at creation time.
            #[must_use]
            pub fn required(&self) -> Self {
                let mut def = self.0.clone();
                def.is_required = true;
                Self(def)
            }

            /// Sets the value used when the caller omits this field.
            #[must_use]
            pub fn default(&self, value: impl Into<Value>) -> Self {
                let mut def = self.0.clone();
                def.default = Some(value.into());
                Self(def)
            }

            /// Sets the display label (UI hint only).
            #[must_use]
            pub fn label(&self, text: impl Into<String>) -> Self {
                let mut def = self.0.clone();
                def.ui.label = Some(text.into());
                Self(def)
            }

            /// Hides the field from generated views (UI hint only).
            #[must_use]
            pub fn hidden(&self) -> Self {
                let mut def = self.0.clone();
                def.ui.hidden = true;
                Self(def)
            }

            /// Renders the field read-only in forms (UI hint only).
            #[must_use]
            pub fn read_only(&self) -> Self {
                let mut def = self.0.clone();
                def.ui.read_only = true;
                Self(def)
            }

            /// Sets the value alignment (UI hint only).
            #[must_use]
            pub fn align(&self, align: Align) -> Self {
                let mut def = self.0.clone();
                def.ui.align = Some(align);
                Self(def)
            }

            /// Sets the rendered column width (UI hint only).
            #[must_use]
            pub fn width(&self, width: impl Into<String>) -> Self {
                let mut def = self.0.clone();
                def.ui.width = Some(width.into());
                Self(def)
            }

            /// Text rendered before the value (UI hint only).
            #[must_use]
            pub fn prefix(&self, prefix: impl Into<String>) -> Self {
                let mut def = self.0.clone();
                def.ui.prefix = Some(prefix.into());
                Self(def)
            }

            /// Text rendered after the value (UI hint only).
            #[must_use]
            pub fn suffix(&self, suffix: impl Into<String>) -> Self {
                let mut def = self.0.clone();
                def.ui.suffix = Some(suffix.into());
                Self(def)
            }
        }

        impl From<$builder> for FieldDef {
            fn from(builder: $builder) -> Self {
                builder.0
            }
        }
    )+};
}

impl_common_mutators!(
    StringField,
    NumberField,
    DateField,
    EnumField,
    RichTextField,
    FileField,
    BooleanField,
);

impl StringField {
    /// Minimum accepted length, in characters.
    #[must_use]
    pub fn min_length(&self, n: usize) -> Self {
        let mut def = self.0.clone();
        if let FieldKind::String { min_length, .. } = &mut def.kind {
            *min_length = Some(n);
        }
        Self(def)
    }

    /// Maximum accepted length, in characters.
    #[must_use]
    pub fn max_length(&self, n: usize) -> Self {
        let mut def = self.0.clone();
        if let FieldKind::String { max_length, .. } = &mut def.kind {
            *max_length = Some(n);
        }
        Self(def)
    }
}

impl NumberField {
    /// Minimum accepted value, inclusive.
    #[must_use]
    pub fn min(&self, value: f64) -> Self {
        let mut def = self.0.clone();
        if let FieldKind::Number { min, .. } = &mut def.kind {
            *min = Some(value);
        }
        Self(def)
    }

    /// Maximum accepted value, inclusive.
    #[must_use]
    pub fn max(&self, value: f64) -> Self {
        let mut def = self.0.clone();
        if let FieldKind::Number { max, .. } = &mut def.kind {
            *max = Some(value);
        }
        Self(def)
    }
}

impl FileField {
    /// Maximum accepted file size, in bytes.
    #[must_use]
    pub fn max_size(&self, bytes: u64) -> Self {
        let mut def = self.0.clone();
        if let FieldKind::File { max_size, .. } = &mut def.kind {
            *max_size = Some(bytes);
        }
        Self(def)
    }

    /// Restricts accepted content types (e.g. `image/png`).
    #[must_use]
    pub fn allowed_types<I, S>(&self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut def = self.0.clone();
        if let FieldKind::File { allowed_types, .. } = &mut def.kind {
            *allowed_types = types.into_iter().map(Into::into).collect();
        }
        Self(def)
    }

    /// Accepts a list of files instead of a single one.
    #[must_use]
    pub fn array(&self) -> Self {
        let mut def = self.0.clone();
        def.is_array = true;
        Self(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutators_do_not_touch_the_receiver() {
        let base = string("title");
        let required = base.required();

        assert!(!base.def().is_required);
        assert!(required.def().is_required);
    }

    #[test]
    fn one_builder_can_fork_into_two_chains() {
        let base = number("score").min(0.0);
        let bounded = base.max(100.0);
        let labeled = base.label("Score");

        assert_eq!(
            bounded.def().kind,
            FieldKind::Number {
                min: Some(0.0),
                max: Some(100.0)
            }
        );
        // the labeled fork never saw .max()
        assert_eq!(
            labeled.def().kind,
            FieldKind::Number {
                min: Some(0.0),
                max: None
            }
        );
    }

    #[test]
    fn chaining_accumulates_settings() {
        let f = string("slug").required().min_length(1).max_length(64).hidden();
        let def = f.def();
        assert!(def.is_required);
        assert!(def.ui.hidden);
        assert_eq!(
            def.kind,
            FieldKind::String {
                min_length: Some(1),
                max_length: Some(64)
            }
        );
    }

    #[test]
    fn inconsistent_bounds_are_stored_not_rejected() {
        // builders never fail; write-time validation owns this
        let f = number("n").min(10.0).max(1.0);
        assert_eq!(
            f.def().kind,
            FieldKind::Number {
                min: Some(10.0),
                max: Some(1.0)
            }
        );
    }

    #[test]
    fn enumeration_keeps_declared_order() {
        let f = enumeration("status", ["open", "closed", "archived"]);
        match &f.def().kind {
            FieldKind::Enum { values } => {
                assert_eq!(values, &["open", "closed", "archived"]);
            }
            other => panic!("expected Enum, got {other:?}"),
        }
    }

    #[test]
    fn file_array_and_limits() {
        let f = file("attachments")
            .max_size(5_000_000)
            .allowed_types(["image/png", "image/jpeg"])
            .array();
        let def = f.def();
        assert!(def.is_array);
        assert_eq!(
            def.kind,
            FieldKind::File {
                max_size: Some(5_000_000),
                allowed_types: vec!["image/png".into(), "image/jpeg".into()],
            }
        );
    }

    #[test]
    fn default_value_is_type_agnostic_json() {
        let s = string("title").default("untitled");
        let b = boolean("done").default(false);
        assert_eq!(s.def().default, Some(json!("untitled")));
        assert_eq!(b.def().default, Some(json!(false)));
    }

    #[test]
    fn field_def_serializes_with_flattened_kind_tag() {
        let def: FieldDef = string("title").max_length(80).into();
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["name"], "title");
        assert_eq!(json["type"], "string");
        assert_eq!(json["maxLength"], 80);
    }

    #[test]
    fn type_names_match_serde_tags() {
        let defs: Vec<FieldDef> = vec![
            string("a").into(),
            number("b").into(),
            date("c").into(),
            enumeration("d", ["x"]).into(),
            richtext("e").into(),
            file("f").into(),
            boolean("g").into(),
        ];
        for def in defs {
            let json = serde_json::to_value(&def).unwrap();
            assert_eq!(json["type"], def.kind.type_name(), "field {}", def.name);
        }
    }
}
