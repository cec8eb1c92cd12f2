//! Sorted key set answering prefix questions
//!
//! Matching is ASCII case-insensitive. A key `k` lives under prefix `p`
//! when `k == p` or `k` continues `p` with `.` or `[`. The empty prefix
//! matches any non-empty container.

use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug, Clone, Default)]
pub struct PrefixContainer {
    /// lowercased key → key as received
    keys: BTreeMap<String, String>,
}

impl PrefixContainer {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for key in keys {
            let key = key.as_ref();
            map.entry(key.to_ascii_lowercase())
                .or_insert_with(|| key.to_string());
        }
        Self { keys: map }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        if prefix.is_empty() {
            return !self.keys.is_empty();
        }

        let lowered = prefix.to_ascii_lowercase();
        self.keys
            .range::<str, _>((Bound::Included(lowered.as_str()), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(lowered.as_str()))
            .any(|(k, _)| is_prefix_boundary(k, lowered.len()))
    }

    /// Immediate children of `prefix`: child name → full key
    ///
    /// `a.b.c` and `a[x].y` under prefix `a` yield `b → a.b` and
    /// `x → a[x]`. The first key seen for a child wins.
    pub fn keys_from_prefix(&self, prefix: &str) -> BTreeMap<String, String> {
        let lowered = prefix.to_ascii_lowercase();
        let mut children = BTreeMap::new();

        for (lower, original) in self.keys.range::<str, _>((Bound::Included(lowered.as_str()), Bound::Unbounded)) {
            if !lower.starts_with(lowered.as_str()) {
                break;
            }

            let rest = &original[prefix.len()..];
            let child = if prefix.is_empty() {
                if rest.starts_with('[') {
                    bracket_child(original, 0)
                } else {
                    let end = rest.find(['.', '[']).unwrap_or(rest.len());
                    Some((rest[..end].to_string(), rest[..end].to_string()))
                }
            } else if let Some(after) = rest.strip_prefix('.') {
                let end = after.find(['.', '[']).unwrap_or(after.len());
                let full_len = prefix.len() + 1 + end;
                Some((after[..end].to_string(), original[..full_len].to_string()))
            } else if rest.starts_with('[') {
                bracket_child(original, prefix.len())
            } else {
                None
            };

            if let Some((name, full_key)) = child {
                if !name.is_empty() {
                    children.entry(name).or_insert(full_key);
                }
            }
        }

        children
    }
}

fn is_prefix_boundary(key: &str, prefix_len: usize) -> bool {
    match key.as_bytes().get(prefix_len) {
        None => true,
        Some(b'.') | Some(b'[') => true,
        Some(_) => false,
    }
}

/// Child inside `[...]` starting at byte `open` of `key`
fn bracket_child(key: &str, open: usize) -> Option<(String, String)> {
    let close = key[open..].find(']')? + open;
    Some((key[open + 1..close].to_string(), key[..=close].to_string()))
}
