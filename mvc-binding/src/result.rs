//! Model binding result

use serde::{de::DeserializeOwned, Serialize};

use crate::value::ModelValue;
use crate::Result;

/// Outcome of one binder invocation
///
/// When `is_model_set` is false, `key` and `model` carry no meaning for
/// callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelBindingResult {
    is_model_set: bool,
    key: String,
    model: Option<ModelValue>,
}

impl ModelBindingResult {
    /// A value was bound (possibly `Null`) under `key`
    pub fn success(key: impl Into<String>, model: ModelValue) -> Self {
        Self {
            is_model_set: true,
            key: key.into(),
            model: Some(model),
        }
    }

    /// Nothing was bound
    pub fn failed(key: impl Into<String>) -> Self {
        Self {
            is_model_set: false,
            key: key.into(),
            model: None,
        }
    }

    pub fn is_model_set(&self) -> bool {
        self.is_model_set
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn model(&self) -> Option<&ModelValue> {
        self.model.as_ref()
    }

    pub fn into_model(self) -> Option<ModelValue> {
        self.model
    }

    /// Convert the bound model into a Rust type through serde
    ///
    /// Returns `Ok(None)` for a failed result.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match (&self.model, self.is_model_set) {
            (Some(model), true) => Ok(Some(serde_json::from_value(model.to_json())?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ModelObject;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Person {
        name: Option<String>,
        age: Option<i64>,
    }

    #[test]
    fn test_success_and_failed() {
        let ok = ModelBindingResult::success("parameter", ModelValue::Null);
        assert!(ok.is_model_set());
        assert_eq!(ok.key(), "parameter");
        assert_eq!(ok.model(), Some(&ModelValue::Null));

        let failed = ModelBindingResult::failed("parameter");
        assert!(!failed.is_model_set());
        assert!(failed.model().is_none());
    }

    #[test]
    fn test_deserialize_typed() {
        let mut object = ModelObject::new("Person", ["Name", "Age"]);
        object.set("Name", ModelValue::String("Billy".to_string()));

        let result = ModelBindingResult::success("", ModelValue::Object(object));
        let person: Person = result.deserialize().unwrap().unwrap();

        assert_eq!(
            person,
            Person {
                name: Some("Billy".to_string()),
                age: None
            }
        );
    }

    #[test]
    fn test_deserialize_failed_is_none() {
        let result = ModelBindingResult::failed("x");
        assert_eq!(result.deserialize::<Person>().unwrap(), None);
    }
}
