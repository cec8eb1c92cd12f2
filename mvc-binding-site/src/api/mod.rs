//! HTTP API handlers for mvc-binding-site

pub mod binding;
pub mod health;

pub use binding::{bind_scenario, list_scenarios, BindingError};
pub use health::health_routes;
