//! Collection binder
//!
//! Three request layouts are understood, tried in order:
//! - Repeated values under the key itself (`ids=1&ids=2`), simple elements only
//! - Explicit indexes listed under `key.index` (`key.index=a&key[a]=...`)
//! - Zero-based indexes (`key[0]`, `key[1]`, ...) up to the first gap
//!
//! Explicit indexes are a finite list, so an element that fails to bind
//! is kept as `Null`. Zero-based binding stops at the first element that
//! fails.

use futures::future::join_all;
use tracing::debug;

use super::simple::convert_scalar;
use super::{BindingContext, BindingEngine, BindingOutcome};
use crate::error::Result;
use crate::metadata::ModelType;
use crate::model_names;
use crate::result::ModelBindingResult;
use crate::value::ModelValue;

pub(crate) async fn bind<'a>(
    engine: &'a BindingEngine,
    mut ctx: BindingContext<'a>,
    element: &'a ModelType,
) -> Result<BindingOutcome> {
    let key = ctx.model_name.clone();
    let max = engine.options().max_collection_size;

    if let ModelType::Simple { kind, nullable } = element {
        if let Some(found) = ctx.value_provider.get_value(&key) {
            ctx.model_state.set_model_value(
                &key,
                found.values().to_vec(),
                found.first_value().map(str::to_string),
            );

            if found.len() > max {
                record_too_large(&mut ctx, &key, max);
            }
            let mut items = Vec::with_capacity(found.len().min(max));
            for raw in found.values().iter().take(max) {
                if let Some(item) =
                    convert_scalar(&mut ctx.model_state, &key, &ctx.field_name, *kind, *nullable, raw)
                {
                    items.push(item);
                }
            }
            return Ok(ctx.finish(ModelBindingResult::success(key, ModelValue::List(items))));
        }
    }

    let explicit = ctx
        .value_provider
        .get_value(&model_names::property(&key, "index"))
        .filter(|found| !found.is_empty());
    let finite = explicit.is_some();

    let mut element_keys: Vec<String> = match explicit {
        Some(found) => found
            .values()
            .iter()
            .map(|index| model_names::index(&key, index.trim()))
            .collect(),
        None => (0..)
            .map(|i| model_names::index(&key, i))
            .take_while(|element_key| ctx.value_provider.contains_prefix(element_key))
            .take(max + 1)
            .collect(),
    };

    if element_keys.len() > max {
        record_too_large(&mut ctx, &key, max);
        element_keys.truncate(max);
    }

    if element_keys.is_empty() {
        debug!(model_name = %key, "No collection data found");
        return Ok(if ctx.is_top_level {
            ctx.finish(ModelBindingResult::success(key, ModelValue::List(Vec::new())))
        } else {
            ctx.fail()
        });
    }

    let pending: Vec<_> = element_keys
        .into_iter()
        .map(|element_key| engine.bind_model(ctx.enter_element(element_key, element)))
        .collect();
    let outcomes = join_all(pending).await;

    let mut items = Vec::with_capacity(outcomes.len());
    let mut stopped = false;
    for outcome in outcomes {
        let BindingOutcome { result, model_state } = outcome?;
        if stopped {
            continue;
        }
        ctx.model_state.merge(model_state);

        match result.into_model() {
            Some(model) => items.push(model),
            None if finite => items.push(ModelValue::Null),
            None => stopped = true,
        }
    }

    Ok(ctx.finish(ModelBindingResult::success(key, ModelValue::List(items))))
}

fn record_too_large(ctx: &mut BindingContext<'_>, key: &str, max: usize) {
    ctx.model_state.try_add_model_error(
        key,
        format!("The collection exceeds the maximum of {} elements.", max),
    );
}
