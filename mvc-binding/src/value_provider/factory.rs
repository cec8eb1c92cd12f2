//! Value provider factories
//!
//! Factories turn a [`RequestContext`] into providers. They are async
//! because a provider may need to read request data first (form bodies,
//! session stores behind custom sources).

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{CompositeValueProvider, RequestValueProvider, ValueProvider};
use crate::config::BindingOptions;
use crate::request::RequestContext;
use crate::source::BindingSource;
use crate::Result;

/// Builds at most one value provider per request
#[async_trait]
pub trait ValueProviderFactory: Send + Sync {
    /// Source of the providers this factory creates
    fn source(&self) -> BindingSource;

    /// `Ok(None)` when the request has no data of this kind
    async fn create_value_provider(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn ValueProvider>>>;
}

/// Query string pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryValueProviderFactory;

#[async_trait]
impl ValueProviderFactory for QueryValueProviderFactory {
    fn source(&self) -> BindingSource {
        BindingSource::Query
    }

    async fn create_value_provider(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn ValueProvider>>> {
        Ok(Some(Arc::new(RequestValueProvider::new(
            BindingSource::Query,
            request.query_pairs().iter().map(|(k, v)| (k, v.clone())),
        ))))
    }
}

/// Route values
///
/// Route keys name URL segments, not model data, so they are kept out of
/// dictionary enumeration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteValueProviderFactory;

#[async_trait]
impl ValueProviderFactory for RouteValueProviderFactory {
    fn source(&self) -> BindingSource {
        BindingSource::Route
    }

    async fn create_value_provider(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn ValueProvider>>> {
        Ok(Some(Arc::new(
            RequestValueProvider::new(
                BindingSource::Route,
                request.route_values().iter().map(|(k, v)| (k, v.clone())),
            )
            .non_enumerable(),
        )))
    }
}

/// Form fields; absent unless the request has a form content type
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValueProviderFactory;

#[async_trait]
impl ValueProviderFactory for FormValueProviderFactory {
    fn source(&self) -> BindingSource {
        BindingSource::Form
    }

    async fn create_value_provider(
        &self,
        request: &RequestContext,
    ) -> Result<Option<Arc<dyn ValueProvider>>> {
        match request.form_pairs() {
            Some(pairs) => Ok(Some(Arc::new(RequestValueProvider::new(
                BindingSource::Form,
                pairs,
            )))),
            None => {
                debug!(
                    content_type = ?request.content_type(),
                    "No form content type, form value provider skipped"
                );
                Ok(None)
            }
        }
    }
}

/// Ordered factory list; order here is provider priority
#[derive(Clone, Default)]
pub struct ValueProviderFactories {
    factories: Vec<Arc<dyn ValueProviderFactory>>,
}

impl ValueProviderFactories {
    /// Built-in factories in `options.provider_order`
    pub fn from_options(options: &BindingOptions) -> Self {
        let factories = options
            .provider_order
            .iter()
            .filter_map(|source| -> Option<Arc<dyn ValueProviderFactory>> {
                match source {
                    BindingSource::Route => Some(Arc::new(RouteValueProviderFactory)),
                    BindingSource::Query => Some(Arc::new(QueryValueProviderFactory)),
                    BindingSource::Form => Some(Arc::new(FormValueProviderFactory)),
                    _ => None,
                }
            })
            .collect();

        Self { factories }
    }

    /// Append a factory at the lowest priority
    pub fn push(&mut self, factory: Arc<dyn ValueProviderFactory>) {
        self.factories.push(factory);
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn sources(&self) -> Vec<BindingSource> {
        self.factories.iter().map(|f| f.source()).collect()
    }

    /// Whether any factory produces providers for `source`
    pub fn serves(&self, source: &BindingSource) -> bool {
        self.factories.iter().any(|f| source.accepts(&f.source()))
    }

    /// Run every factory and aggregate the providers they return
    pub async fn create_composite(&self, request: &RequestContext) -> Result<CompositeValueProvider> {
        let mut composite = CompositeValueProvider::default();
        for factory in &self.factories {
            if let Some(provider) = factory.create_value_provider(request).await? {
                composite.push(provider);
            }
        }
        Ok(composite)
    }
}
