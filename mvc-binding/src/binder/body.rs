//! Body binder
//!
//! Reads the whole request body as JSON and maps it onto the declared
//! model type. Object members match property names case-insensitively.
//! Members that cannot be mapped record an error under their nested key
//! and leave the property unset; the rest of the model still binds.

use serde_json::Value;
use tracing::debug;

use super::simple::convert_scalar;
use super::{BindingContext, BindingEngine, BindingOutcome};
use crate::metadata::{MetadataRegistry, ModelType, ScalarKind};
use crate::model_names;
use crate::model_state::ModelStateDictionary;
use crate::result::ModelBindingResult;
use crate::value::{ModelObject, ModelValue};

pub(crate) fn bind(engine: &BindingEngine, mut ctx: BindingContext<'_>) -> BindingOutcome {
    let request = ctx.request;
    let key = ctx.model_name.clone();

    let body = match request.body() {
        Some(body) if !body.iter().all(u8::is_ascii_whitespace) => body,
        _ => return ctx.fail(),
    };

    if !request.has_json_content_type() {
        ctx.model_state.try_add_model_error(
            &key,
            format!(
                "Unsupported content type '{}'.",
                request.content_type().unwrap_or_default()
            ),
        );
        return ctx.fail();
    }

    let json: Value = match serde_json::from_slice(body) {
        Ok(json) => json,
        Err(e) => {
            debug!(key = %key, error = %e, "Request body is not valid JSON");
            ctx.model_state
                .try_add_model_error(&key, format!("The request body is not valid JSON: {}", e));
            return ctx.fail();
        }
    };

    let model = {
        let mut reader = JsonReader {
            registry: engine.registry(),
            max_depth: engine.options().max_recursion_depth,
            field_name: &ctx.field_name,
            model_state: &mut ctx.model_state,
        };
        reader.read(ctx.model_type, &json, &key, 0)
    };

    match model {
        Some(model) => ctx.finish(ModelBindingResult::success(key, model)),
        None => ctx.fail(),
    }
}

struct JsonReader<'r> {
    registry: &'r MetadataRegistry,
    max_depth: usize,
    field_name: &'r str,
    model_state: &'r mut ModelStateDictionary,
}

impl JsonReader<'_> {
    fn read(&mut self, model_type: &ModelType, json: &Value, key: &str, depth: usize) -> Option<ModelValue> {
        if depth > self.max_depth {
            self.model_state.try_add_model_error(
                key,
                format!(
                    "Model binding exceeded the maximum recursion depth of {}.",
                    self.max_depth
                ),
            );
            return None;
        }

        match (model_type, json) {
            (ModelType::Simple { kind, nullable }, json) => self.read_scalar(*kind, *nullable, json, key),
            (_, Value::Null) => Some(ModelValue::Null),
            (ModelType::Complex { type_name }, Value::Object(members)) => {
                let metadata = match self.registry.resolve(type_name) {
                    Ok(metadata) => metadata.clone(),
                    Err(e) => {
                        self.model_state.try_add_model_error(key, e.to_string());
                        return None;
                    }
                };

                let mut object = ModelObject::new(
                    metadata.name(),
                    metadata.properties().iter().map(|p| p.name()),
                );
                for property in metadata.bindable_properties() {
                    let member = members
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(property.name()));
                    if let Some((_, value)) = member {
                        let child_key = model_names::property(key, property.name());
                        if let Some(value) = self.read(property.model_type(), value, &child_key, depth + 1) {
                            object.set(property.name(), value);
                        }
                    }
                }
                Some(ModelValue::Object(object))
            }
            (ModelType::Collection { element }, Value::Array(items)) => {
                let list = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.read(element, item, &model_names::index(key, i), depth + 1)
                            .unwrap_or(ModelValue::Null)
                    })
                    .collect();
                Some(ModelValue::List(list))
            }
            (ModelType::Dictionary { value }, Value::Object(members)) => {
                let mut entries = Vec::with_capacity(members.len());
                for (name, member) in members {
                    if let Some(item) = self.read(value, member, &model_names::index(key, name), depth + 1) {
                        entries.push((name.clone(), item));
                    }
                }
                Some(ModelValue::Map(entries))
            }
            (other, _) => {
                self.model_state.try_add_model_error(
                    key,
                    format!("The JSON value could not be converted to {:?}.", other.shape()),
                );
                None
            }
        }
    }

    fn read_scalar(&mut self, kind: ScalarKind, nullable: bool, json: &Value, key: &str) -> Option<ModelValue> {
        match json {
            Value::Null if kind == ScalarKind::String || nullable => Some(ModelValue::Null),
            Value::Null => {
                self.model_state
                    .try_add_model_error(key, format!("A null value is not valid for {}.", self.field_name));
                None
            }
            Value::String(s) => convert_scalar(self.model_state, key, self.field_name, kind, nullable, s),
            Value::Bool(b) if kind == ScalarKind::Bool => Some(ModelValue::Bool(*b)),
            Value::Bool(b) => {
                convert_scalar(self.model_state, key, self.field_name, kind, nullable, &b.to_string())
            }
            Value::Number(n) => {
                convert_scalar(self.model_state, key, self.field_name, kind, nullable, &n.to_string())
            }
            Value::Array(_) | Value::Object(_) => {
                self.model_state.try_add_model_error(
                    key,
                    format!("The JSON value could not be converted to {}.", kind.name()),
                );
                None
            }
        }
    }
}
