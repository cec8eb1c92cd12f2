//! Per-request model state
//!
//! Records, per binding key, the raw value a binder attempted and any
//! conversion/validation errors. The error count is maintained on every
//! mutation so `error_count()` and `is_valid()` never drift from the
//! entries.
//!
//! Sibling property binders each fill their own dictionary; the parent
//! binder merges them after joining. Consumers must not rely on entry
//! insertion order across siblings.

use serde::Serialize;
use std::collections::BTreeMap;

/// Default cap on recorded errors per request
pub const DEFAULT_MAX_ALLOWED_ERRORS: usize = 200;

/// Message recorded under the empty key when the cap is reached
pub const TOO_MANY_ERRORS_MESSAGE: &str = "The maximum number of allowed model errors has been reached.";

/// One recorded error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelError {
    pub message: String,
}

impl ModelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// State recorded for one key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelStateEntry {
    /// All raw values found for the key
    pub raw_value: Vec<String>,
    /// The value the binder tried to convert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_value: Option<String>,
    pub errors: Vec<ModelError>,
}

impl ModelStateEntry {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Key → entry ledger for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStateDictionary {
    entries: BTreeMap<String, ModelStateEntry>,
    error_count: usize,
    max_allowed_errors: usize,
    #[serde(skip)]
    reached_max: bool,
}

impl Default for ModelStateDictionary {
    fn default() -> Self {
        Self::with_max_errors(DEFAULT_MAX_ALLOWED_ERRORS)
    }
}

impl ModelStateDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cap of zero is raised to one so the overflow marker always fits
    pub fn with_max_errors(max_allowed_errors: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            error_count: 0,
            max_allowed_errors: max_allowed_errors.max(1),
            reached_max: false,
        }
    }

    /// An empty dictionary with the same error cap
    pub fn scratch(&self) -> Self {
        Self::with_max_errors(self.max_allowed_errors)
    }

    /// Record the raw values a binder found and the one it attempted
    pub fn set_model_value(
        &mut self,
        key: &str,
        raw_value: Vec<String>,
        attempted_value: Option<String>,
    ) {
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.raw_value = raw_value;
        entry.attempted_value = attempted_value;
    }

    /// Add an error under `key`
    ///
    /// Returns false when the cap was already reached. When exactly one
    /// slot remains, the overflow marker is recorded under the empty key
    /// instead of `message`.
    pub fn try_add_model_error(&mut self, key: &str, message: impl Into<String>) -> bool {
        if self.reached_max {
            return false;
        }

        if self.error_count + 1 >= self.max_allowed_errors {
            self.push_error("", ModelError::new(TOO_MANY_ERRORS_MESSAGE));
            self.reached_max = true;
            return false;
        }

        self.push_error(key, ModelError::new(message));
        true
    }

    fn push_error(&mut self, key: &str, error: ModelError) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .errors
            .push(error);
        self.error_count += 1;
    }

    /// Fold another dictionary into this one
    ///
    /// Errors go through the cap of `self`; raw values of `other` win on
    /// key collisions.
    pub fn merge(&mut self, other: ModelStateDictionary) {
        let mut overflowed = false;

        for (key, entry) in other.entries {
            let ModelStateEntry {
                raw_value,
                attempted_value,
                errors,
            } = entry;

            {
                let target = self.entries.entry(key.clone()).or_default();
                if !raw_value.is_empty() || attempted_value.is_some() {
                    target.raw_value = raw_value;
                    target.attempted_value = attempted_value;
                }
            }

            for error in errors {
                if error.message == TOO_MANY_ERRORS_MESSAGE && key.is_empty() {
                    overflowed = true;
                    continue;
                }
                self.try_add_model_error(&key, error.message);
            }
        }

        // Overflow in a child means the child dropped errors
        if overflowed && !self.reached_max {
            self.push_error("", ModelError::new(TOO_MANY_ERRORS_MESSAGE));
            self.reached_max = true;
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModelStateEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ModelStateEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys of entries with at least one error
    pub fn keys_with_errors(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_valid())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn is_valid(&self) -> bool {
        self.error_count == 0
    }

    pub fn has_reached_max_errors(&self) -> bool {
        self.reached_max
    }

    pub fn max_allowed_errors(&self) -> usize {
        self.max_allowed_errors
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.error_count = 0;
        self.reached_max = false;
    }
}
