//! Prefix selection for top-level parameters
//!
//! The decision is binary and made once per parameter, against the
//! aggregate filtered by the parameter's own binding source. Property-level
//! source restrictions are applied later, while recursing, and never feed
//! back into this choice.

use tracing::debug;

use crate::value_provider::CompositeValueProvider;

/// Pick the prefix a top-level parameter binds under
///
/// Returns `parameter_name` when any provider of `filtered` holds a key
/// at or below it, otherwise the empty prefix.
pub fn select_prefix(parameter_name: &str, filtered: &CompositeValueProvider) -> String {
    let prefix = if filtered.contains_prefix(parameter_name) {
        parameter_name.to_string()
    } else {
        String::new()
    };

    debug!(
        parameter = parameter_name,
        prefix = %prefix,
        providers = filtered.len(),
        "Selected binding prefix"
    );
    prefix
}
