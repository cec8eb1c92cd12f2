//! Complex (object) binder
//!
//! Binds each bindable property in its own child context and joins them.
//! A nested object is only created when at least one of its properties can
//! find data; a top-level object is always created.

use futures::future::join_all;
use tracing::debug;

use super::{BindingContext, BindingEngine, BindingOutcome};
use crate::error::Result;
use crate::metadata::{BindingBehavior, PropertyMetadata, TypeMetadata};
use crate::model_names;
use crate::result::ModelBindingResult;
use crate::source::BindingSource;
use crate::value::{ModelObject, ModelValue};

pub(crate) async fn bind<'a>(
    engine: &'a BindingEngine,
    mut ctx: BindingContext<'a>,
    type_name: &'a str,
) -> Result<BindingOutcome> {
    let metadata: &'a TypeMetadata = engine.registry().resolve(type_name)?.as_ref();

    if !ctx.is_top_level && !can_create_model(&ctx, metadata) {
        debug!(model_name = %ctx.model_name, type_name, "No data for nested model, leaving unset");
        return Ok(ctx.fail());
    }

    let mut model = ModelObject::new(
        metadata.name(),
        metadata.properties().iter().map(|p| p.name()),
    );

    let properties: Vec<&'a PropertyMetadata> = metadata.bindable_properties().collect();
    let pending: Vec<_> = properties
        .iter()
        .copied()
        .map(|property| engine.bind_model(ctx.enter_property(property)))
        .collect();
    let outcomes = join_all(pending).await;

    for (property, outcome) in properties.into_iter().zip(outcomes) {
        let BindingOutcome { result, model_state } = outcome?;
        ctx.model_state.merge(model_state);

        if result.is_model_set() {
            model.set(property.name(), result.into_model().unwrap_or(ModelValue::Null));
        } else if property.binding_behavior() == BindingBehavior::Required {
            ctx.model_state.try_add_model_error(
                result.key(),
                format!(
                    "A value for the '{}' parameter or property was not provided.",
                    property.field_name()
                ),
            );
        }
    }

    debug!(
        model_name = %ctx.model_name,
        type_name,
        bound = model.set_count(),
        "Complex model bound"
    );

    let key = ctx.model_name.clone();
    Ok(ctx.finish(ModelBindingResult::success(key, ModelValue::Object(model))))
}

/// True when any bindable property could find data under the current name
fn can_create_model(ctx: &BindingContext<'_>, metadata: &TypeMetadata) -> bool {
    metadata.bindable_properties().any(|property| {
        let key = model_names::property(&ctx.model_name, property.field_name());
        match property.binding_source() {
            Some(BindingSource::Header) => !ctx.request.header_values(property.field_name()).is_empty(),
            Some(BindingSource::Body) => ctx
                .request
                .body()
                .is_some_and(|body| !body.iter().all(u8::is_ascii_whitespace)),
            Some(source) => ctx
                .original_value_provider
                .filter(Some(source))
                .contains_prefix(&key),
            None => ctx.value_provider.contains_prefix(&key),
        }
    })
}
