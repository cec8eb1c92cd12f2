//! Model key composition
//!
//! Keys follow the dotted/indexed form used in request data:
//! `prefix.Property`, `prefix[0]`, `prefix[key]`.

use std::fmt::Display;

/// Key for a property under `prefix`; just `property` when the prefix is empty
pub fn property(prefix: &str, property: &str) -> String {
    if prefix.is_empty() {
        property.to_string()
    } else if property.is_empty() {
        prefix.to_string()
    } else {
        format!("{}.{}", prefix, property)
    }
}

/// Key for an element under `prefix`
pub fn index(prefix: &str, index: impl Display) -> String {
    format!("{}[{}]", prefix, index)
}
