//! Scalar kinds and raw-string conversion
//!
//! Every simple model property names one [`ScalarKind`]. The kind owns the
//! conversion from a raw request string into a [`ModelValue`].

use chrono::DateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::value::ModelValue;

/// Primitive target types a simple binder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Bool,
    Int,
    UInt,
    Float,
    Uuid,
    /// RFC 3339 timestamp with offset
    DateTime,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "i64",
            ScalarKind::UInt => "u64",
            ScalarKind::Float => "f64",
            ScalarKind::Uuid => "uuid",
            ScalarKind::DateTime => "datetime",
        }
    }

    /// Convert a non-empty raw value
    ///
    /// Strings are taken verbatim; every other kind ignores surrounding
    /// whitespace. The error string describes the failure for logs; the
    /// user-facing model-state message is built by the binder.
    pub fn convert(&self, raw: &str) -> Result<ModelValue, String> {
        let s = raw.trim();
        match self {
            ScalarKind::String => Ok(ModelValue::String(raw.to_string())),
            ScalarKind::Bool => {
                if s.eq_ignore_ascii_case("true") {
                    Ok(ModelValue::Bool(true))
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(ModelValue::Bool(false))
                } else {
                    Err(format!("'{}' is not a boolean", s))
                }
            }
            ScalarKind::Int => s
                .parse::<i64>()
                .map(ModelValue::Int)
                .map_err(|e| format!("'{}' is not an integer: {}", s, e)),
            ScalarKind::UInt => s
                .parse::<u64>()
                .map(ModelValue::UInt)
                .map_err(|e| format!("'{}' is not an unsigned integer: {}", s, e)),
            ScalarKind::Float => s
                .parse::<f64>()
                .map(ModelValue::Float)
                .map_err(|e| format!("'{}' is not a number: {}", s, e)),
            ScalarKind::Uuid => Uuid::parse_str(s)
                .map(ModelValue::Uuid)
                .map_err(|e| format!("'{}' is not a UUID: {}", s, e)),
            ScalarKind::DateTime => DateTime::parse_from_rfc3339(s)
                .map(ModelValue::DateTime)
                .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", s, e)),
        }
    }
}
