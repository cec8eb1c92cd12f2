//! Binding scenarios served by the site
//!
//! Each scenario is one action parameter bound against whatever request
//! reaches `/binding/:scenario`. The `Person` family mirrors the classic
//! prefix-selection cases:
//! - unrestricted parameter with a Form-only property
//! - unrestricted parameter with a Query-only property
//! - Header-bound property next to value-provider properties
//! - nested addresses, collections and dictionaries

use std::collections::BTreeMap;

use mvc_binding::{
    BindingEngine, BindingSource, MetadataRegistry, MetadataRegistryBuilder, ModelType,
    ParameterDescriptor, PropertyMetadata, Result, ScalarKind, TypeMetadata,
};

/// One named binding target
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub parameter: ParameterDescriptor,
}

/// Scenario name → scenario
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, description: &str, parameter: ParameterDescriptor) -> Self {
        self.scenarios.insert(
            name.to_string(),
            Scenario {
                name: name.to_string(),
                description: description.to_string(),
                parameter,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Scenarios in name order
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Check every scenario parameter against the engine's registry
    pub fn validate(&self, engine: &BindingEngine) -> Result<()> {
        for scenario in self.scenarios.values() {
            engine.validate_parameter(&scenario.parameter)?;
        }
        Ok(())
    }
}

/// Types the built-in scenarios bind
pub fn registry() -> Result<MetadataRegistry> {
    MetadataRegistryBuilder::new()
        .add_type(
            TypeMetadata::new("Person")
                .property(PropertyMetadata::new("Name", ModelType::string()))
                .property(PropertyMetadata::new("Age", ModelType::int()))
                .property(PropertyMetadata::new("Home", ModelType::complex("Address")))
                .property(PropertyMetadata::new("Tags", ModelType::collection(ModelType::string())))
                .property(PropertyMetadata::new("Scores", ModelType::dictionary(ModelType::int()))),
        )
        .add_type(
            TypeMetadata::new("Address")
                .property(PropertyMetadata::new("Street", ModelType::string()))
                .property(PropertyMetadata::new("City", ModelType::string()))
                .property(PropertyMetadata::new("Zip", ModelType::nullable(ScalarKind::UInt))),
        )
        .add_type(
            TypeMetadata::new("FormPerson")
                .property(PropertyMetadata::new("Name", ModelType::string()).from_source(BindingSource::Form)),
        )
        .add_type(
            TypeMetadata::new("QueryPerson")
                .property(PropertyMetadata::new("Name", ModelType::string()).from_source(BindingSource::Query)),
        )
        .add_type(
            TypeMetadata::new("HeaderPerson")
                .property(PropertyMetadata::new("Name", ModelType::string()))
                .property(
                    PropertyMetadata::new("Token", ModelType::string())
                        .from_source(BindingSource::Header)
                        .with_binder_model_name("X-Token"),
                )
                .property(PropertyMetadata::new("Id", ModelType::int()).required()),
        )
        .build()
}

/// Built-in scenarios
pub fn catalog() -> ScenarioCatalog {
    ScenarioCatalog::new()
        .add(
            "form-only-name",
            "Unrestricted parameter whose Name only binds from the form",
            ParameterDescriptor::new("parameter", ModelType::complex("FormPerson")),
        )
        .add(
            "query-only-name",
            "Unrestricted parameter whose Name only binds from the query string",
            ParameterDescriptor::new("parameter", ModelType::complex("QueryPerson")),
        )
        .add(
            "person",
            "Person with nested address, tags and scores",
            ParameterDescriptor::new("person", ModelType::complex("Person")),
        )
        .add(
            "person-body",
            "Person read from a JSON body",
            ParameterDescriptor::new("person", ModelType::complex("Person")).from_source(BindingSource::Body),
        )
        .add(
            "header-person",
            "Person with a header-bound token and a required id",
            ParameterDescriptor::new("person", ModelType::complex("HeaderPerson")),
        )
        .add(
            "ids",
            "Collection of integers",
            ParameterDescriptor::new("ids", ModelType::collection(ModelType::int())),
        )
        .add(
            "scores",
            "Dictionary of integers",
            ParameterDescriptor::new("scores", ModelType::dictionary(ModelType::int())),
        )
        .add(
            "route-scenario",
            "Route value holding the scenario name",
            ParameterDescriptor::new("scenario", ModelType::string()).from_source(BindingSource::Route),
        )
}
