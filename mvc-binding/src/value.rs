//! Dynamically typed bound values
//!
//! Binders assemble results as [`ModelValue`] trees shaped by the model
//! metadata. Typed access goes through serde: `ModelValue::to_json()`
//! followed by `serde_json::from_value::<T>()`.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

/// A bound value
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    Null,
    String(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Uuid(Uuid),
    DateTime(DateTime<FixedOffset>),
    Object(ModelObject),
    List(Vec<ModelValue>),
    /// Dictionary entries in binding order
    Map(Vec<(String, ModelValue)>),
}

impl ModelValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ModelValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ModelValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ModelObject> {
        match self {
            ModelValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ModelValue]> {
        match self {
            ModelValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a dictionary entry by key
    pub fn map_get(&self, key: &str) -> Option<&ModelValue> {
        match self {
            ModelValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert to a JSON value
    ///
    /// Non-finite floats become `null`; date-times use RFC 3339.
    pub fn to_json(&self) -> Value {
        match self {
            ModelValue::Null => Value::Null,
            ModelValue::String(s) => Value::String(s.clone()),
            ModelValue::Bool(b) => Value::Bool(*b),
            ModelValue::Int(i) => Value::Number((*i).into()),
            ModelValue::UInt(u) => Value::Number((*u).into()),
            ModelValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            ModelValue::Uuid(id) => Value::String(id.to_string()),
            ModelValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ModelValue::Object(object) => object.to_json(),
            ModelValue::List(items) => Value::Array(items.iter().map(ModelValue::to_json).collect()),
            ModelValue::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl Serialize for ModelValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A complex model instance: type name plus properties in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject {
    type_name: String,
    properties: Vec<(String, ModelValue)>,
}

impl ModelObject {
    /// Default-constructed instance: every property starts as `Null`
    pub fn new<I, S>(type_name: impl Into<String>, property_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            properties: property_names
                .into_iter()
                .map(|name| (name.into(), ModelValue::Null))
                .collect(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn properties(&self) -> &[(String, ModelValue)] {
        &self.properties
    }

    pub fn get(&self, name: &str) -> Option<&ModelValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Assign a property; unknown names are appended
    pub fn set(&mut self, name: &str, value: ModelValue) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((name.to_string(), value)),
        }
    }

    /// Number of properties holding a non-null value
    pub fn set_count(&self) -> usize {
        self.properties.iter().filter(|(_, v)| !v.is_null()).count()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.properties {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}
