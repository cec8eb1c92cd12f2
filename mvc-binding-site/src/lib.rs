//! mvc-binding-site library - model binding test website
//!
//! Serves the registered binding scenarios over HTTP so the engine can be
//! exercised with real requests:
//! - `GET /health`
//! - `GET /binding` (scenario listing)
//! - `GET|POST /binding/:scenario`

use std::sync::Arc;

use axum::Router;
use mvc_binding::{BindingEngine, BindingOptions};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod scenarios;
pub mod snapshot;

pub use scenarios::{Scenario, ScenarioCatalog};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BindingEngine>,
    pub scenarios: Arc<ScenarioCatalog>,
    /// Cancelled on shutdown; in-flight bindings observe a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(engine: BindingEngine, scenarios: ScenarioCatalog, shutdown: CancellationToken) -> Self {
        Self {
            engine: Arc::new(engine),
            scenarios: Arc::new(scenarios),
            shutdown,
        }
    }

    /// Engine over the built-in scenario types, with every scenario checked
    /// against the registry before the first request
    pub fn from_options(options: BindingOptions, shutdown: CancellationToken) -> mvc_binding::Result<Self> {
        let engine = BindingEngine::new(scenarios::registry()?, options)?;
        let catalog = scenarios::catalog();
        catalog.validate(&engine)?;
        Ok(Self::new(engine, catalog, shutdown))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/binding", get(api::list_scenarios))
        .route(
            "/binding/:scenario",
            get(api::bind_scenario).post(api::bind_scenario),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
