//! Model metadata
//!
//! Bindable types are described once, at startup, by a metadata table:
//! type name → ordered list of properties with their declared binding
//! source and model type. Binders read this table instead of inspecting
//! types at runtime.
//!
//! # Usage
//!
//! ```rust
//! use mvc_binding::metadata::{
//!     MetadataRegistryBuilder, ModelType, PropertyMetadata, TypeMetadata,
//! };
//! use mvc_binding::BindingSource;
//!
//! let registry = MetadataRegistryBuilder::new()
//!     .add_type(
//!         TypeMetadata::new("Person")
//!             .property(PropertyMetadata::new("Name", ModelType::string())
//!                 .from_source(BindingSource::Form))
//!             .property(PropertyMetadata::new("Age", ModelType::int())),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.resolve("Person").unwrap().properties().len(), 2);
//! ```

use serde::Serialize;

use crate::source::BindingSource;

mod registry;
mod scalar;
#[cfg(test)]
mod tests;

pub use registry::{MetadataRegistry, MetadataRegistryBuilder};
pub use scalar::ScalarKind;

/// Declared type of a parameter or property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ModelType {
    /// Primitive converted from a single raw string
    Simple { kind: ScalarKind, nullable: bool },
    /// Object graph described by a registered [`TypeMetadata`]
    Complex { type_name: String },
    /// Ordered sequence of elements
    Collection { element: Box<ModelType> },
    /// String-keyed map of values
    Dictionary { value: Box<ModelType> },
}

impl ModelType {
    pub fn simple(kind: ScalarKind) -> Self {
        ModelType::Simple { kind, nullable: false }
    }

    pub fn nullable(kind: ScalarKind) -> Self {
        ModelType::Simple { kind, nullable: true }
    }

    pub fn string() -> Self {
        Self::simple(ScalarKind::String)
    }

    pub fn int() -> Self {
        Self::simple(ScalarKind::Int)
    }

    pub fn bool() -> Self {
        Self::simple(ScalarKind::Bool)
    }

    pub fn complex(type_name: impl Into<String>) -> Self {
        ModelType::Complex { type_name: type_name.into() }
    }

    pub fn collection(element: ModelType) -> Self {
        ModelType::Collection { element: Box::new(element) }
    }

    pub fn dictionary(value: ModelType) -> Self {
        ModelType::Dictionary { value: Box::new(value) }
    }

    /// Shape classifier used to pick a binder strategy
    pub fn shape(&self) -> ModelShape {
        match self {
            ModelType::Simple { .. } => ModelShape::Simple,
            ModelType::Complex { .. } => ModelShape::Complex,
            ModelType::Collection { .. } => ModelShape::Collection,
            ModelType::Dictionary { .. } => ModelShape::Dictionary,
        }
    }

    /// Complex type names referenced anywhere in this type
    pub(crate) fn referenced_types(&self) -> Vec<&str> {
        match self {
            ModelType::Simple { .. } => Vec::new(),
            ModelType::Complex { type_name } => vec![type_name.as_str()],
            ModelType::Collection { element } => element.referenced_types(),
            ModelType::Dictionary { value } => value.referenced_types(),
        }
    }
}

/// Coarse classification of a [`ModelType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelShape {
    Simple,
    Complex,
    Collection,
    Dictionary,
}

/// Whether a property takes part in binding and whether absence is an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingBehavior {
    #[default]
    Optional,
    /// Absence records a model-state error
    Required,
    /// Property is never bound
    Never,
}

/// One bindable property of a complex type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMetadata {
    name: String,
    model_type: ModelType,
    binding_source: Option<BindingSource>,
    binder_model_name: Option<String>,
    binding_behavior: BindingBehavior,
}

impl PropertyMetadata {
    pub fn new(name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            name: name.into(),
            model_type,
            binding_source: None,
            binder_model_name: None,
            binding_behavior: BindingBehavior::Optional,
        }
    }

    /// Restrict the property to one binding source
    pub fn from_source(mut self, source: BindingSource) -> Self {
        self.binding_source = Some(source);
        self
    }

    /// Look the property up under `name` instead of its own name
    pub fn with_binder_model_name(mut self, name: impl Into<String>) -> Self {
        self.binder_model_name = Some(name.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.binding_behavior = BindingBehavior::Required;
        self
    }

    pub fn never_bind(mut self) -> Self {
        self.binding_behavior = BindingBehavior::Never;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    pub fn binding_source(&self) -> Option<&BindingSource> {
        self.binding_source.as_ref()
    }

    pub fn binder_model_name(&self) -> Option<&str> {
        self.binder_model_name.as_deref()
    }

    pub fn binding_behavior(&self) -> BindingBehavior {
        self.binding_behavior
    }

    /// Key segment used for lookups: the binder model name if set, else the property name
    pub fn field_name(&self) -> &str {
        self.binder_model_name.as_deref().unwrap_or(&self.name)
    }
}

/// Bindable properties of one complex type, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMetadata {
    name: String,
    properties: Vec<PropertyMetadata>,
}

impl TypeMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, property: PropertyMetadata) -> Self {
        self.properties.push(property);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[PropertyMetadata] {
        &self.properties
    }

    /// Properties that take part in binding
    pub fn bindable_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties
            .iter()
            .filter(|p| p.binding_behavior != BindingBehavior::Never)
    }
}

/// Types that describe their own binding metadata
///
/// Implementors usually also derive `serde::Deserialize` so a bound
/// result can be turned back into the Rust type.
pub trait Bindable {
    fn type_metadata() -> TypeMetadata;
}

/// Top-level action parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    name: String,
    model_type: ModelType,
    binding_source: Option<BindingSource>,
    binder_model_name: Option<String>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            name: name.into(),
            model_type,
            binding_source: None,
            binder_model_name: None,
        }
    }

    pub fn from_source(mut self, source: BindingSource) -> Self {
        self.binding_source = Some(source);
        self
    }

    /// Explicit prefix; bypasses prefix selection
    pub fn with_binder_model_name(mut self, name: impl Into<String>) -> Self {
        self.binder_model_name = Some(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    pub fn binding_source(&self) -> Option<&BindingSource> {
        self.binding_source.as_ref()
    }

    pub fn binder_model_name(&self) -> Option<&str> {
        self.binder_model_name.as_deref()
    }
}
