//! Layout groups and the schema node tree.
//!
//! A declared entity is an ordered list of [`SchemaNode`]s — fields and
//! groups, with groups nesting arbitrarily. Groups exist for the UI; the
//! compiler flattens them away (depth-first, pre-order) when it assigns
//! field order.

use crate::field::FieldDef;
use serde::{Deserialize, Serialize};

/// A node in an entity declaration: either a leaf field or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum SchemaNode {
    Field(FieldDef),
    Group(FieldGroup),
}

impl From<FieldDef> for SchemaNode {
    fn from(def: FieldDef) -> Self {
        Self::Field(def)
    }
}

impl From<FieldGroup> for SchemaNode {
    fn from(group: FieldGroup) -> Self {
        Self::Group(group)
    }
}

// Builders convert through FieldDef so `fields![string("a"), group(..)]`
// accepts both without ceremony.
macro_rules! impl_node_from_builder {
    ($($builder:ident),+ $(,)?) => {$(
        impl From<crate::field::$builder> for SchemaNode {
            fn from(builder: crate::field::$builder) -> Self {
                Self::Field(builder.into())
            }
        }
    )+};
}

impl_node_from_builder!(
    StringField,
    NumberField,
    DateField,
    EnumField,
    RichTextField,
    FileField,
    BooleanField,
);

/// An optional group label, so `group("Address", …)`, `group(None, …)` and
/// `group((), …)` all read naturally at the call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLabel(Option<String>);

impl From<&str> for GroupLabel {
    fn from(label: &str) -> Self {
        Self(Some(label.to_string()))
    }
}

impl From<String> for GroupLabel {
    fn from(label: String) -> Self {
        Self(Some(label))
    }
}

impl From<Option<String>> for GroupLabel {
    fn from(label: Option<String>) -> Self {
        Self(label)
    }
}

impl From<Option<&str>> for GroupLabel {
    fn from(label: Option<&str>) -> Self {
        Self(label.map(str::to_string))
    }
}

impl From<()> for GroupLabel {
    fn from(_: ()) -> Self {
        Self(None)
    }
}

/// A named-or-nameless container of fields and nested groups.
///
/// Everything here is a layout hint for the UI renderer; nothing affects
/// validation or storage. Mutators follow the same immutable `&self -> Self`
/// convention as the field builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub horizontal: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    pub children: Vec<SchemaNode>,
}

/// A vertical group of fields and/or nested groups.
pub fn group(label: impl Into<GroupLabel>, children: Vec<SchemaNode>) -> FieldGroup {
    FieldGroup {
        label: label.into().0,
        horizontal: false,
        collapsible: false,
        id: None,
        border: None,
        padding: None,
        children,
    }
}

/// A horizontal group — same semantics as [`group`], row layout.
pub fn hgroup(label: impl Into<GroupLabel>, children: Vec<SchemaNode>) -> FieldGroup {
    FieldGroup {
        horizontal: true,
        ..group(label, children)
    }
}

impl FieldGroup {
    /// Lets the UI collapse the group.
    #[must_use]
    pub fn collapsible(&self) -> Self {
        let mut next = self.clone();
        next.collapsible = true;
        next
    }

    /// Stable identifier for the rendered container.
    #[must_use]
    pub fn id(&self, id: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.id = Some(id.into());
        next
    }

    /// CSS border pass-through.
    #[must_use]
    pub fn border(&self, border: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.border = Some(border.into());
        next
    }

    /// CSS padding pass-through.
    #[must_use]
    pub fn padding(&self, padding: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.padding = Some(padding.into());
        next
    }
}

/// Flattens a node list into its leaf fields, depth-first, pre-order.
///
/// Each group contributes its leaves in declaration order before later
/// siblings are visited. Flattening never fails; rejecting duplicate field
/// names is the compiler's job, on top of this.
#[must_use]
pub fn flatten(nodes: &[SchemaNode]) -> Vec<&FieldDef> {
    let mut out = Vec::new();
    collect(nodes, &mut out);
    out
}

fn collect<'a>(nodes: &'a [SchemaNode], out: &mut Vec<&'a FieldDef>) {
    for node in nodes {
        match node {
            SchemaNode::Field(def) => out.push(def),
            SchemaNode::Group(group) => collect(&group.children, out),
        }
    }
}

/// Builds a `Vec<SchemaNode>` from a mixed list of field builders and groups.
///
/// ```
/// use trellis_model::{fields, group, string, boolean};
///
/// let nodes = fields![
///     string("title").required(),
///     group("Details", fields![string("body"), boolean("done")]),
/// ];
/// assert_eq!(nodes.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    ($($node:expr),* $(,)?) => {
        vec![$($crate::SchemaNode::from($node)),*]
    };
}
