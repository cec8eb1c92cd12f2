//! Dictionary binder
//!
//! Key/value pairs posted as `key[i].Key` / `key[i].Value` win. Otherwise
//! every immediate child of the model name becomes an entry
//! (`key[red]=1`, `key.blue=2`). Entries whose value fails to bind are
//! left out.

use futures::future::join_all;
use tracing::debug;

use super::{BindingContext, BindingEngine, BindingOutcome};
use crate::error::Result;
use crate::metadata::ModelType;
use crate::model_names;
use crate::result::ModelBindingResult;
use crate::value::ModelValue;

pub(crate) async fn bind<'a>(
    engine: &'a BindingEngine,
    mut ctx: BindingContext<'a>,
    value_type: &'a ModelType,
) -> Result<BindingOutcome> {
    let key = ctx.model_name.clone();
    let max = engine.options().max_collection_size;

    let mut entries = key_value_pairs(&ctx, &key, max);
    if entries.is_empty() {
        entries = ctx.value_provider.keys_from_prefix(&key).into_iter().collect();
    }

    if entries.len() > max {
        ctx.model_state.try_add_model_error(
            &key,
            format!("The collection exceeds the maximum of {} elements.", max),
        );
        entries.truncate(max);
    }

    if entries.is_empty() {
        debug!(model_name = %key, "No dictionary data found");
        return Ok(if ctx.is_top_level {
            ctx.finish(ModelBindingResult::success(key, ModelValue::Map(Vec::new())))
        } else {
            ctx.fail()
        });
    }

    let pending: Vec<_> = entries
        .iter()
        .map(|(_, value_key)| engine.bind_model(ctx.enter_element(value_key.clone(), value_type)))
        .collect();
    let outcomes = join_all(pending).await;

    let mut map = Vec::with_capacity(entries.len());
    for ((entry_key, _), outcome) in entries.into_iter().zip(outcomes) {
        let BindingOutcome { result, model_state } = outcome?;
        ctx.model_state.merge(model_state);
        if let Some(model) = result.into_model() {
            map.push((entry_key, model));
        }
    }

    Ok(ctx.finish(ModelBindingResult::success(key, ModelValue::Map(map))))
}

/// `(entry key, value model name)` for each contiguous `key[i].Key`
///
/// Reads one past `max` so the caller can detect overflow.
fn key_value_pairs(ctx: &BindingContext<'_>, key: &str, max: usize) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for i in 0..=max {
        let element = model_names::index(key, i);
        let Some(found) = ctx
            .value_provider
            .get_value(&model_names::property(&element, "Key"))
        else {
            break;
        };
        let entry_key = found.first_value().unwrap_or_default().to_string();
        pairs.push((entry_key, model_names::property(&element, "Value")));
    }

    pairs
}
