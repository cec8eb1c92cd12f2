//! # Binders
//!
//! [`BindingEngine`] owns the metadata registry, the options and the
//! value-provider factories. It drives one binding attempt per action
//! parameter:
//! - Filter the request aggregate by the parameter's declared source
//! - Pick the model-name prefix (explicit name, field name, or prefix rule)
//! - Dispatch on model shape through [`ModelBinderKind`]
//! - Fold the attempt's model state into the caller's dictionary
//!
//! Complex, collection and dictionary binders fan their children out with
//! `join_all`; every child fills its own model-state scratch which the
//! parent merges once the join completes.

mod body;
mod collection;
mod complex;
mod context;
mod dictionary;
mod header;
mod simple;


pub use context::BindingContext;

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::BindingOptions;
use crate::error::{Error, Result};
use crate::metadata::{MetadataRegistry, ModelType, ParameterDescriptor};
use crate::model_state::ModelStateDictionary;
use crate::prefix::select_prefix;
use crate::request::RequestContext;
use crate::result::ModelBindingResult;
use crate::source::BindingSource;
use crate::value_provider::{CompositeValueProvider, ValueProviderFactories, ValueProviderFactory};

/// Which binder handles a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelBinderKind {
    /// Reads a request header named by the field name
    Header,
    /// Deserializes the JSON request body
    Body,
    Simple,
    Complex,
    Collection,
    Dictionary,
}

impl ModelBinderKind {
    /// Greedy sources pick their own binder; everything else goes by shape
    pub fn select(model_type: &ModelType, source: Option<&BindingSource>) -> Self {
        match source {
            Some(BindingSource::Header) => return ModelBinderKind::Header,
            Some(BindingSource::Body) => return ModelBinderKind::Body,
            _ => {}
        }

        match model_type {
            ModelType::Simple { .. } => ModelBinderKind::Simple,
            ModelType::Complex { .. } => ModelBinderKind::Complex,
            ModelType::Collection { .. } => ModelBinderKind::Collection,
            ModelType::Dictionary { .. } => ModelBinderKind::Dictionary,
        }
    }
}

/// What one binder invocation hands back to its parent
#[derive(Debug)]
pub(crate) struct BindingOutcome {
    pub(crate) result: ModelBindingResult,
    pub(crate) model_state: ModelStateDictionary,
}

/// Results of binding every parameter of one action
#[derive(Debug, Clone, Serialize)]
pub struct ActionBindingResult {
    /// Parameter name → result, in declaration order
    pub results: Vec<(String, ModelBindingResult)>,
    pub model_state: ModelStateDictionary,
}

impl ActionBindingResult {
    pub fn get(&self, parameter_name: &str) -> Option<&ModelBindingResult> {
        self.results
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(parameter_name))
            .map(|(_, result)| result)
    }

    pub fn is_valid(&self) -> bool {
        self.model_state.is_valid()
    }
}

pub struct BindingEngine {
    registry: Arc<MetadataRegistry>,
    options: BindingOptions,
    factories: ValueProviderFactories,
}

impl BindingEngine {
    /// Build an engine; rejects invalid options
    pub fn new(registry: MetadataRegistry, options: BindingOptions) -> Result<Self> {
        options.validate()?;
        let factories = ValueProviderFactories::from_options(&options);

        debug!(
            types = registry.len(),
            sources = ?factories.sources(),
            "Binding engine created"
        );

        Ok(Self {
            registry: Arc::new(registry),
            options,
            factories,
        })
    }

    /// Append a provider factory after the configured ones
    pub fn with_value_provider_factory(mut self, factory: Arc<dyn ValueProviderFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    pub fn value_provider_factories(&self) -> &ValueProviderFactories {
        &self.factories
    }

    /// Empty model state carrying the configured error cap
    pub fn new_model_state(&self) -> ModelStateDictionary {
        ModelStateDictionary::with_max_errors(self.options.max_allowed_errors)
    }

    /// Check a parameter before any request arrives
    ///
    /// Fails when the parameter references an unregistered type or names a
    /// custom source no factory serves.
    pub fn validate_parameter(&self, parameter: &ParameterDescriptor) -> Result<()> {
        self.registry.validate_parameter(parameter)?;

        if let Some(source @ BindingSource::Custom(_)) = parameter.binding_source() {
            if !self.factories.serves(source) {
                return Err(Error::Configuration(format!(
                    "parameter '{}': no value provider serves binding source '{}'",
                    parameter.name(),
                    source
                )));
            }
        }

        Ok(())
    }

    /// Build the request-wide aggregate from the registered factories
    pub async fn create_value_provider(&self, request: &RequestContext) -> Result<CompositeValueProvider> {
        self.factories.create_composite(request).await
    }

    /// Bind one top-level parameter
    ///
    /// Entries and errors recorded during the attempt are merged into
    /// `model_state`. Returns `Error::Cancelled` when `cancel` fires before
    /// the attempt completes and `Error::UnknownType` when the parameter
    /// references an unregistered type.
    pub async fn bind_parameter(
        &self,
        request: &RequestContext,
        value_provider: &CompositeValueProvider,
        parameter: &ParameterDescriptor,
        model_state: &mut ModelStateDictionary,
        cancel: &CancellationToken,
    ) -> Result<ModelBindingResult> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.registry.check_references(parameter.model_type())?;

        let source = parameter.binding_source();
        let filtered = value_provider.filter(source.filter(|s| !s.is_greedy()));

        let model_name = match (parameter.binder_model_name(), source) {
            (Some(name), _) => name.to_string(),
            (None, Some(source)) if source.is_greedy() => parameter.name().to_string(),
            (None, _) => select_prefix(parameter.name(), &filtered),
        };

        debug!(
            parameter = parameter.name(),
            model_name = %model_name,
            source = ?source,
            providers = filtered.len(),
            "Binding parameter"
        );

        let context = BindingContext::top_level(
            request,
            value_provider,
            filtered,
            parameter,
            model_name,
            model_state.scratch(),
            cancel,
        );
        let outcome = self.bind_model(context).await?;
        model_state.merge(outcome.model_state);

        debug!(
            parameter = parameter.name(),
            is_model_set = outcome.result.is_model_set(),
            "Parameter bound"
        );

        Ok(outcome.result)
    }

    /// Bind every parameter of an action against one request
    ///
    /// Parameters are bound in declaration order against a shared
    /// aggregate and a shared model state.
    pub async fn bind_action(
        &self,
        request: &RequestContext,
        parameters: &[ParameterDescriptor],
        cancel: &CancellationToken,
    ) -> Result<ActionBindingResult> {
        let value_provider = self.create_value_provider(request).await?;
        let mut model_state = self.new_model_state();
        let mut results = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            let result = self
                .bind_parameter(request, &value_provider, parameter, &mut model_state, cancel)
                .await?;
            results.push((parameter.name().to_string(), result));
        }

        Ok(ActionBindingResult {
            results,
            model_state,
        })
    }

    /// Dispatch one binding attempt to the binder for its shape
    ///
    /// Boxed so complex, collection and dictionary binders can recurse.
    pub(crate) fn bind_model<'a>(&'a self, mut ctx: BindingContext<'a>) -> BoxFuture<'a, Result<BindingOutcome>> {
        async move {
            if ctx.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            if ctx.depth > self.options.max_recursion_depth {
                let key = ctx.model_name.clone();
                ctx.model_state.try_add_model_error(
                    &key,
                    format!(
                        "Model binding exceeded the maximum recursion depth of {}.",
                        self.options.max_recursion_depth
                    ),
                );
                return Ok(ctx.fail());
            }

            let unserved = match &ctx.binding_source {
                Some(source @ BindingSource::Custom(_)) => !self.factories.serves(source),
                _ => false,
            };
            if unserved {
                warn!(
                    model_name = %ctx.model_name,
                    source = ?ctx.binding_source,
                    "No value provider serves binding source, skipping"
                );
                return Ok(ctx.fail());
            }

            let model_type: &'a ModelType = ctx.model_type;
            match ModelBinderKind::select(model_type, ctx.binding_source.as_ref()) {
                ModelBinderKind::Header => Ok(header::bind(ctx)),
                ModelBinderKind::Body => Ok(body::bind(self, ctx)),
                _ => match model_type {
                    ModelType::Simple { kind, nullable } => Ok(simple::bind(ctx, *kind, *nullable)),
                    ModelType::Complex { type_name } => complex::bind(self, ctx, type_name).await,
                    ModelType::Collection { element } => collection::bind(self, ctx, element).await,
                    ModelType::Dictionary { value } => dictionary::bind(self, ctx, value).await,
                },
            }
        }
        .boxed()
    }
}
