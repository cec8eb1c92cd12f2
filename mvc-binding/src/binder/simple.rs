//! Simple (scalar) binder

use tracing::debug;

use super::{BindingContext, BindingOutcome};
use crate::metadata::ScalarKind;
use crate::model_state::ModelStateDictionary;
use crate::result::ModelBindingResult;
use crate::value::ModelValue;

/// Look up the model name and convert the first value found
///
/// A missing key is a silent failure. A present key always records its
/// raw values, and a failed conversion records an error under the key.
pub(crate) fn bind(mut ctx: BindingContext<'_>, kind: ScalarKind, nullable: bool) -> BindingOutcome {
    let key = ctx.model_name.clone();
    let Some(found) = ctx.value_provider.get_value(&key) else {
        return ctx.fail();
    };

    let attempted = found.first_value().unwrap_or_default().to_string();
    ctx.model_state
        .set_model_value(&key, found.values().to_vec(), Some(attempted.clone()));

    match convert_scalar(&mut ctx.model_state, &key, &ctx.field_name, kind, nullable, &attempted) {
        Some(value) => ctx.finish(ModelBindingResult::success(key, value)),
        None => ctx.finish(ModelBindingResult::failed(key)),
    }
}

/// Convert one raw value, recording an error under `key` on failure
///
/// Empty or whitespace input yields `Null` for strings and nullable kinds
/// and is an error for everything else.
pub(crate) fn convert_scalar(
    model_state: &mut ModelStateDictionary,
    key: &str,
    field_name: &str,
    kind: ScalarKind,
    nullable: bool,
    raw: &str,
) -> Option<ModelValue> {
    if raw.trim().is_empty() {
        if kind == ScalarKind::String || nullable {
            return Some(ModelValue::Null);
        }
        model_state.try_add_model_error(key, format!("The value '{}' is invalid.", raw));
        return None;
    }

    match kind.convert(raw) {
        Ok(value) => Some(value),
        Err(reason) => {
            debug!(key, kind = kind.name(), reason = %reason, "Value conversion failed");
            model_state.try_add_model_error(
                key,
                format!("The value '{}' is not valid for {}.", raw, field_name),
            );
            None
        }
    }
}
