//! # MVC Model Binding
//!
//! Decision engine that turns raw request values into model objects:
//! - Value providers over query string, form and route values
//! - Binding-source filtering per parameter and per property
//! - Prefix selection for top-level parameters
//! - Binders for simple, complex, collection and dictionary models
//! - Per-request model state (attempted values and conversion errors)
//!
//! The hosting layer hands the engine an immutable [`RequestContext`];
//! the engine returns one [`ModelBindingResult`] per parameter plus a
//! populated [`ModelStateDictionary`].

pub mod binder;
pub mod config;
pub mod error;
pub mod metadata;
pub mod model_names;
pub mod model_state;
pub mod prefix;
pub mod request;
pub mod result;
pub mod source;
pub mod value;
pub mod value_provider;

pub use binder::{ActionBindingResult, BindingEngine, ModelBinderKind};
pub use config::BindingOptions;
pub use error::{Error, Result};
pub use metadata::{
    Bindable, BindingBehavior, MetadataRegistry, MetadataRegistryBuilder, ModelShape, ModelType,
    ParameterDescriptor, PropertyMetadata, ScalarKind, TypeMetadata,
};
pub use model_state::{ModelError, ModelStateDictionary, ModelStateEntry};
pub use prefix::select_prefix;
pub use request::RequestContext;
pub use result::ModelBindingResult;
pub use source::BindingSource;
pub use value::{ModelObject, ModelValue};
pub use value_provider::{CompositeValueProvider, ValueProvider, ValueProviderResult};
