//! Header binder
//!
//! Reads the header named by the field name. No prefix applies. Simple
//! models take the header's values joined with `,`; collections of simple
//! elements split every value on `,`.

use tracing::warn;

use super::simple::convert_scalar;
use super::{BindingContext, BindingOutcome};
use crate::metadata::ModelType;
use crate::result::ModelBindingResult;
use crate::value::ModelValue;

pub(crate) fn bind(mut ctx: BindingContext<'_>) -> BindingOutcome {
    let request = ctx.request;
    let key = ctx.model_name.clone();
    let values: Vec<String> = request
        .header_values(&ctx.field_name)
        .into_iter()
        .map(str::to_string)
        .collect();

    if values.is_empty() {
        return ctx.fail();
    }

    let joined = values.join(",");
    ctx.model_state
        .set_model_value(&key, values.clone(), Some(joined.clone()));

    let model_type: &ModelType = ctx.model_type;
    match model_type {
        ModelType::Simple { kind, nullable } => {
            match convert_scalar(&mut ctx.model_state, &key, &ctx.field_name, *kind, *nullable, &joined) {
                Some(value) => ctx.finish(ModelBindingResult::success(key, value)),
                None => ctx.fail(),
            }
        }
        ModelType::Collection { element } => {
            let ModelType::Simple { kind, nullable } = element.as_ref() else {
                warn!(header = %ctx.field_name, "Header binding supports collections of simple elements only");
                return ctx.fail();
            };

            let mut items = Vec::new();
            for part in values.iter().flat_map(|value| value.split(',')) {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                if let Some(item) =
                    convert_scalar(&mut ctx.model_state, &key, &ctx.field_name, *kind, *nullable, part)
                {
                    items.push(item);
                }
            }
            ctx.finish(ModelBindingResult::success(key, ModelValue::List(items)))
        }
        other => {
            warn!(
                header = %ctx.field_name,
                shape = ?other.shape(),
                "Header binding supports simple models and collections only"
            );
            ctx.fail()
        }
    }
}
