//! Ordered aggregate of value providers
//!
//! Lookups return the first provider (in priority order) holding the key.
//! Prefix checks are a union over all providers: one provider lacking the
//! prefix never hides another that has it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{ValueProvider, ValueProviderResult};
use crate::source::BindingSource;

/// Priority-ordered set of providers for one request
#[derive(Clone, Default)]
pub struct CompositeValueProvider {
    providers: Vec<Arc<dyn ValueProvider>>,
}

impl CompositeValueProvider {
    pub fn new(providers: Vec<Arc<dyn ValueProvider>>) -> Self {
        Self { providers }
    }

    pub fn push(&mut self, provider: Arc<dyn ValueProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Sources of the providers, in priority order
    pub fn sources(&self) -> Vec<BindingSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Restrict to providers a declared source accepts
    ///
    /// `None` returns the aggregate unchanged. The receiver is never
    /// modified, so sibling properties can filter it differently.
    pub fn filter(&self, source: Option<&BindingSource>) -> CompositeValueProvider {
        match source {
            None => self.clone(),
            Some(source) => CompositeValueProvider {
                providers: self
                    .providers
                    .iter()
                    .filter(|p| source.accepts(&p.source()))
                    .cloned()
                    .collect(),
            },
        }
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.providers.iter().any(|p| p.contains_prefix(prefix))
    }

    pub fn get_value(&self, key: &str) -> Option<ValueProviderResult> {
        self.providers.iter().find_map(|p| p.get_value(key))
    }

    /// Children of `prefix` across enumerable providers; earlier providers win
    pub fn keys_from_prefix(&self, prefix: &str) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for provider in self.providers.iter().filter(|p| p.is_enumerable()) {
            for (child, full_key) in provider.keys_from_prefix(prefix) {
                merged.entry(child).or_insert(full_key);
            }
        }
        merged
    }
}

impl fmt::Debug for CompositeValueProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeValueProvider")
            .field("sources", &self.sources())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_provider::RequestValueProvider;

    fn provider(source: BindingSource, pairs: Vec<(&str, &str)>) -> Arc<dyn ValueProvider> {
        Arc::new(RequestValueProvider::new(source, pairs))
    }

    fn aggregate() -> CompositeValueProvider {
        CompositeValueProvider::new(vec![
            provider(BindingSource::Route, vec![("id", "route-id")]),
            provider(BindingSource::Query, vec![("id", "query-id"), ("page", "2")]),
            provider(BindingSource::Form, vec![("Person.Name", "Billy")]),
        ])
    }

    #[test]
    fn test_lookup_is_first_match_in_order() {
        let composite = aggregate();
        assert_eq!(composite.get_value("id").unwrap().first_value(), Some("route-id"));
        assert_eq!(composite.get_value("page").unwrap().first_value(), Some("2"));
        assert!(composite.get_value("missing").is_none());
    }

    #[test]
    fn test_contains_prefix_is_union() {
        // Route and query lack "Person" but the form has it
        assert!(aggregate().contains_prefix("Person"));
        assert!(!aggregate().contains_prefix("Nobody"));
    }

    #[test]
    fn test_filter_none_is_unchanged() {
        let composite = aggregate();
        let filtered = composite.filter(None);
        assert_eq!(filtered.sources(), composite.sources());
    }

    #[test]
    fn test_filter_keeps_matching_sources_only() {
        let composite = aggregate();
        let query_only = composite.filter(Some(&BindingSource::Query));

        assert_eq!(query_only.sources(), vec![BindingSource::Query]);
        assert_eq!(query_only.get_value("id").unwrap().first_value(), Some("query-id"));
        assert!(!query_only.contains_prefix("Person"));

        // Original untouched
        assert_eq!(composite.len(), 3);
    }

    #[test]
    fn test_filter_without_match_is_empty() {
        let filtered = aggregate().filter(Some(&BindingSource::Custom("session".to_string())));
        assert!(filtered.is_empty());
        assert!(!filtered.contains_prefix(""));
    }

    #[test]
    fn test_keys_from_prefix_merges() {
        let composite = CompositeValueProvider::new(vec![
            provider(BindingSource::Query, vec![("map[a]", "1")]),
            provider(BindingSource::Form, vec![("map[a]", "2"), ("map[b]", "3")]),
        ]);

        let keys = composite.keys_from_prefix("map");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys["a"], "map[a]");
        assert_eq!(keys["b"], "map[b]");
    }

    #[test]
    fn test_keys_from_prefix_skips_non_enumerable() {
        let route: Arc<dyn ValueProvider> = Arc::new(
            RequestValueProvider::new(BindingSource::Route, vec![("scenario", "scores")])
                .non_enumerable(),
        );
        let composite = CompositeValueProvider::new(vec![
            route,
            provider(BindingSource::Query, vec![("page", "2")]),
        ]);

        let keys = composite.keys_from_prefix("");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys["page"], "page");
        assert!(composite.contains_prefix("scenario"));
    }
}
