//! Binding sources
//!
//! A binding source names where a value may come from. Parameters and
//! properties declare one optionally; `None` means "any source".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Origin of a request value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BindingSource {
    /// Query string pairs
    Query,
    /// Form fields (only when the request has a form content type)
    Form,
    /// Route values extracted by the routing layer
    Route,
    /// A single request header, read directly by name
    Header,
    /// The request body, parsed as JSON
    Body,
    /// Application-defined source backed by a registered value provider factory
    Custom(String),
}

impl BindingSource {
    /// Greedy sources read their data directly and never take part in
    /// prefixed value-provider lookups.
    pub fn is_greedy(&self) -> bool {
        matches!(self, BindingSource::Header | BindingSource::Body)
    }

    /// Whether a value provider of kind `provider` may serve this source
    pub fn accepts(&self, provider: &BindingSource) -> bool {
        self == provider
    }

    /// Sources that value provider factories can produce
    pub fn is_value_provider_source(&self) -> bool {
        !self.is_greedy()
    }
}

impl fmt::Display for BindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingSource::Query => write!(f, "query"),
            BindingSource::Form => write!(f, "form"),
            BindingSource::Route => write!(f, "route"),
            BindingSource::Header => write!(f, "header"),
            BindingSource::Body => write!(f, "body"),
            BindingSource::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

impl FromStr for BindingSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(name) = trimmed.strip_prefix("custom:") {
            if name.is_empty() {
                return Err(Error::InvalidInput(
                    "custom binding source requires a name".to_string(),
                ));
            }
            return Ok(BindingSource::Custom(name.to_string()));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "query" => Ok(BindingSource::Query),
            "form" => Ok(BindingSource::Form),
            "route" => Ok(BindingSource::Route),
            "header" => Ok(BindingSource::Header),
            "body" => Ok(BindingSource::Body),
            other => Err(Error::InvalidInput(format!(
                "unknown binding source '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for BindingSource {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BindingSource> for String {
    fn from(source: BindingSource) -> Self {
        source.to_string()
    }
}
