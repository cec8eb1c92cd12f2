//! Value providers
//!
//! A value provider wraps one source of key/value request data behind a
//! uniform lookup. Providers are built once per request, never change
//! afterwards, and are shared behind `Arc` so concurrent property binders
//! can read them without locking.

use std::collections::{BTreeMap, HashMap};

use crate::source::BindingSource;

mod composite;
mod factory;
mod prefix_container;

pub use composite::CompositeValueProvider;
pub use factory::{
    FormValueProviderFactory, QueryValueProviderFactory, RouteValueProviderFactory,
    ValueProviderFactories, ValueProviderFactory,
};
pub use prefix_container::PrefixContainer;

/// Raw values found for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueProviderResult {
    values: Vec<String>,
}

impl ValueProviderResult {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// First value; binders of single values use this one
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Uniform lookup over one source of request data
pub trait ValueProvider: Send + Sync {
    /// Kind of data this provider serves
    fn source(&self) -> BindingSource;

    /// True if some key equals `prefix` or lives below it
    fn contains_prefix(&self, prefix: &str) -> bool;

    /// Values stored under exactly `key`
    fn get_value(&self, key: &str) -> Option<ValueProviderResult>;

    /// Immediate children of `prefix`: child name → full key
    fn keys_from_prefix(&self, prefix: &str) -> BTreeMap<String, String>;

    /// Whether `keys_from_prefix` may list this provider's keys
    ///
    /// Providers answering `false` still serve lookups and prefix checks
    /// but never contribute dictionary entries.
    fn is_enumerable(&self) -> bool {
        true
    }
}

/// Provider over a snapshot of key/value pairs
///
/// Keys are case-insensitive; repeated keys keep every value in arrival
/// order.
#[derive(Debug, Clone)]
pub struct RequestValueProvider {
    source: BindingSource,
    values: HashMap<String, Vec<String>>,
    prefixes: PrefixContainer,
    enumerable: bool,
}

impl RequestValueProvider {
    pub fn new<I, K, V>(source: BindingSource, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        let mut keys = Vec::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            keys.push(key.to_string());
            values
                .entry(key.to_ascii_lowercase())
                .or_default()
                .push(value.into());
        }

        Self {
            source,
            values,
            prefixes: PrefixContainer::new(keys),
            enumerable: true,
        }
    }

    /// Hide keys from enumeration (route values)
    pub fn non_enumerable(mut self) -> Self {
        self.enumerable = false;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueProvider for RequestValueProvider {
    fn source(&self) -> BindingSource {
        self.source.clone()
    }

    fn contains_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains_prefix(prefix)
    }

    fn get_value(&self, key: &str) -> Option<ValueProviderResult> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(|values| ValueProviderResult::new(values.clone()))
    }

    fn keys_from_prefix(&self, prefix: &str) -> BTreeMap<String, String> {
        self.prefixes.keys_from_prefix(prefix)
    }

    fn is_enumerable(&self) -> bool {
        self.enumerable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_value_case_insensitive() {
        let provider = RequestValueProvider::new(BindingSource::Query, vec![("Name", "Billy")]);

        let result = provider.get_value("name").unwrap();
        assert_eq!(result.first_value(), Some("Billy"));
        assert!(provider.get_value("Missing").is_none());
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let provider = RequestValueProvider::new(
            BindingSource::Query,
            vec![("ids", "1"), ("IDS", "2"), ("ids", "3")],
        );

        let result = provider.get_value("ids").unwrap();
        assert_eq!(result.values(), &["1", "2", "3"]);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_empty_value_is_still_present() {
        let provider = RequestValueProvider::new(BindingSource::Query, vec![("parameter", "")]);

        assert!(provider.contains_prefix("parameter"));
        assert_eq!(provider.get_value("parameter").unwrap().first_value(), Some(""));
    }

    #[test]
    fn test_source_reported() {
        let provider = RequestValueProvider::new(BindingSource::Form, Vec::<(&str, &str)>::new());
        assert_eq!(provider.source(), BindingSource::Form);
        assert!(provider.is_empty());
        assert!(!provider.contains_prefix(""));
    }

    #[test]
    fn test_non_enumerable_still_serves_lookups() {
        let provider =
            RequestValueProvider::new(BindingSource::Route, vec![("scenario", "scores")]).non_enumerable();

        assert!(!provider.is_enumerable());
        assert!(provider.contains_prefix("scenario"));
        assert_eq!(provider.get_value("scenario").unwrap().first_value(), Some("scores"));
    }
}
