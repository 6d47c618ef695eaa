//! The single case-conversion authority.
//!
//! Field and entity names are declared in whatever case the developer likes
//! (typically camelCase); storage columns and table names are snake_case.
//! Every component converts through these two functions so the mapping can
//! never drift between the compiler and the storage adapter.

use convert_case::{Case, Casing};

/// Converts a declared name to its storage (snake_case) form.
#[must_use]
pub fn snake_case(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Converts a storage name back to its declared (camelCase) form.
#[must_use]
pub fn camel_case(name: &str) -> String {
    name.to_case(Case::Camel)
}
