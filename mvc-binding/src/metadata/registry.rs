//! Metadata registry
//!
//! Built once before any request is processed. `build()` is where a model
//! that cannot be represented (unknown type reference, duplicate property)
//! fails, so those faults never reach request time.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::{Bindable, ModelType, ParameterDescriptor, TypeMetadata};
use crate::{Error, Result};

/// Collects type metadata and validates it as a whole
#[derive(Debug, Default)]
pub struct MetadataRegistryBuilder {
    types: Vec<TypeMetadata>,
}

impl MetadataRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(mut self, metadata: TypeMetadata) -> Self {
        self.types.push(metadata);
        self
    }

    /// Register a type through its [`Bindable`] implementation
    pub fn register<T: Bindable>(self) -> Self {
        self.add_type(T::type_metadata())
    }

    /// Validate and freeze the table
    ///
    /// # Errors
    /// `Error::Configuration` when a type name is empty or duplicated, a
    /// property name is empty or duplicated (case-insensitive), or a
    /// property refers to a complex type that was never registered.
    pub fn build(self) -> Result<MetadataRegistry> {
        let mut types: HashMap<String, Arc<TypeMetadata>> = HashMap::new();

        for metadata in self.types {
            if metadata.name().trim().is_empty() {
                return Err(Error::Configuration("type name must not be empty".to_string()));
            }

            let mut seen = HashSet::new();
            for property in metadata.properties() {
                if property.name().trim().is_empty() {
                    return Err(Error::Configuration(format!(
                        "type '{}' has a property with an empty name",
                        metadata.name()
                    )));
                }
                if !seen.insert(property.name().to_ascii_lowercase()) {
                    return Err(Error::Configuration(format!(
                        "type '{}' declares property '{}' more than once",
                        metadata.name(),
                        property.name()
                    )));
                }
            }

            let name = metadata.name().to_string();
            if types.insert(name.clone(), Arc::new(metadata)).is_some() {
                return Err(Error::Configuration(format!(
                    "type '{}' registered more than once",
                    name
                )));
            }
        }

        let registry = MetadataRegistry { types };
        for metadata in registry.types.values() {
            for property in metadata.properties() {
                registry.check_references(property.model_type()).map_err(|e| {
                    Error::Configuration(format!(
                        "property '{}.{}': {}",
                        metadata.name(),
                        property.name(),
                        e
                    ))
                })?;
            }
        }

        debug!(types = registry.len(), "Model metadata registry built");
        Ok(registry)
    }
}

/// Immutable type name → metadata table
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    types: HashMap<String, Arc<TypeMetadata>>,
}

impl MetadataRegistry {
    pub fn get(&self, type_name: &str) -> Option<&Arc<TypeMetadata>> {
        self.types.get(type_name)
    }

    /// Like [`get`](Self::get) but fails with `Error::UnknownType`
    pub fn resolve(&self, type_name: &str) -> Result<&Arc<TypeMetadata>> {
        self.types
            .get(type_name)
            .ok_or_else(|| Error::UnknownType(type_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check that every complex type a model type refers to is registered
    pub fn check_references(&self, model_type: &ModelType) -> Result<()> {
        for name in model_type.referenced_types() {
            if !self.types.contains_key(name) {
                return Err(Error::UnknownType(name.to_string()));
            }
        }
        Ok(())
    }

    /// Configuration-time check for a top-level parameter
    pub fn validate_parameter(&self, parameter: &ParameterDescriptor) -> Result<()> {
        if parameter.name().trim().is_empty() {
            return Err(Error::Configuration("parameter name must not be empty".to_string()));
        }
        self.check_references(parameter.model_type()).map_err(|e| {
            Error::Configuration(format!("parameter '{}': {}", parameter.name(), e))
        })
    }
}
