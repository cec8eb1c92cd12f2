//! Per-attempt binding state
//!
//! A [`BindingContext`] lives for exactly one binder invocation. Entering a
//! property or element builds a fresh child context with its own model
//! state scratch; the parent folds the child's state back in after the
//! child completes.

use tokio_util::sync::CancellationToken;

use super::BindingOutcome;
use crate::metadata::{ModelType, ParameterDescriptor, PropertyMetadata};
use crate::model_names;
use crate::model_state::ModelStateDictionary;
use crate::request::RequestContext;
use crate::result::ModelBindingResult;
use crate::source::BindingSource;
use crate::value_provider::CompositeValueProvider;

pub struct BindingContext<'a> {
    pub(crate) request: &'a RequestContext,
    /// Unfiltered request aggregate; property-level sources filter this one
    pub(crate) original_value_provider: &'a CompositeValueProvider,
    /// Aggregate visible to this attempt
    pub(crate) value_provider: CompositeValueProvider,
    pub(crate) model_name: String,
    pub(crate) field_name: String,
    pub(crate) model_type: &'a ModelType,
    pub(crate) binding_source: Option<BindingSource>,
    pub(crate) is_top_level: bool,
    pub(crate) depth: usize,
    pub(crate) model_state: ModelStateDictionary,
    pub(crate) cancel: &'a CancellationToken,
}

impl<'a> BindingContext<'a> {
    pub(crate) fn top_level(
        request: &'a RequestContext,
        original_value_provider: &'a CompositeValueProvider,
        filtered: CompositeValueProvider,
        parameter: &'a ParameterDescriptor,
        model_name: String,
        model_state: ModelStateDictionary,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            request,
            original_value_provider,
            value_provider: filtered,
            model_name,
            field_name: parameter
                .binder_model_name()
                .unwrap_or(parameter.name())
                .to_string(),
            model_type: parameter.model_type(),
            binding_source: parameter.binding_source().cloned(),
            is_top_level: true,
            depth: 0,
            model_state,
            cancel,
        }
    }

    /// Child context for one property of the current complex model
    ///
    /// A property with its own non-greedy source filters the original
    /// aggregate, independent of the parent's restriction. A property
    /// without one inherits the parent's aggregate and source.
    pub(crate) fn enter_property(&self, property: &'a PropertyMetadata) -> BindingContext<'a> {
        let value_provider = match property.binding_source() {
            Some(source) if !source.is_greedy() => {
                self.original_value_provider.filter(Some(source))
            }
            _ => self.value_provider.clone(),
        };

        BindingContext {
            request: self.request,
            original_value_provider: self.original_value_provider,
            value_provider,
            model_name: model_names::property(&self.model_name, property.field_name()),
            field_name: property.field_name().to_string(),
            model_type: property.model_type(),
            binding_source: property
                .binding_source()
                .cloned()
                .or_else(|| self.binding_source.clone()),
            is_top_level: false,
            depth: self.depth + 1,
            model_state: self.model_state.scratch(),
            cancel: self.cancel,
        }
    }

    /// Child context for a collection element or dictionary value
    pub(crate) fn enter_element(&self, model_name: String, model_type: &'a ModelType) -> BindingContext<'a> {
        BindingContext {
            request: self.request,
            original_value_provider: self.original_value_provider,
            value_provider: self.value_provider.clone(),
            model_name,
            field_name: self.field_name.clone(),
            model_type,
            binding_source: self.binding_source.clone(),
            is_top_level: false,
            depth: self.depth + 1,
            model_state: self.model_state.scratch(),
            cancel: self.cancel,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_top_level(&self) -> bool {
        self.is_top_level
    }

    /// End the attempt, handing back its model state with the result
    pub(crate) fn finish(self, result: ModelBindingResult) -> BindingOutcome {
        BindingOutcome {
            result,
            model_state: self.model_state,
        }
    }

    /// Failed result keyed by this attempt's model name
    pub(crate) fn fail(self) -> BindingOutcome {
        let key = self.model_name.clone();
        self.finish(ModelBindingResult::failed(key))
    }
}
