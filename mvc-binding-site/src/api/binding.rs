//! Scenario binding endpoint
//!
//! Binds the scenario's parameter against the incoming request and
//! reports the result together with the model state. An invalid model
//! state answers 400 with the same body.

use std::collections::BTreeMap;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mvc_binding::{ModelBindingResult, ModelStateDictionary, ModelStateEntry};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

use crate::snapshot::{self, SnapshotError};
use crate::AppState;

/// Model state as reported to clients
#[derive(Debug, Serialize)]
pub struct ModelStateReport {
    pub is_valid: bool,
    pub error_count: usize,
    pub entries: BTreeMap<String, ModelStateEntry>,
}

impl From<&ModelStateDictionary> for ModelStateReport {
    fn from(state: &ModelStateDictionary) -> Self {
        Self {
            is_valid: state.is_valid(),
            error_count: state.error_count(),
            entries: state
                .entries()
                .map(|(key, entry)| (key.to_string(), entry.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BindingResponse {
    pub scenario: String,
    pub result: ModelBindingResult,
    pub model_state: ModelStateReport,
}

/// One entry of the scenario listing
#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub description: String,
    pub parameter: String,
}

/// GET /binding
pub async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<ScenarioSummary>> {
    Json(
        state
            .scenarios
            .iter()
            .map(|scenario| ScenarioSummary {
                name: scenario.name.clone(),
                description: scenario.description.clone(),
                parameter: scenario.parameter.name().to_string(),
            })
            .collect(),
    )
}

/// GET|POST /binding/:scenario
pub async fn bind_scenario(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request<Body>,
) -> Result<Response, BindingError> {
    let scenario = state
        .scenarios
        .get(&name)
        .ok_or_else(|| BindingError::UnknownScenario(name.clone()))?;

    let context = snapshot::capture(request, &[("scenario", name.as_str())]).await?;
    let value_provider = state.engine.create_value_provider(&context).await?;
    let mut model_state = state.engine.new_model_state();
    let cancel = state.shutdown.child_token();

    let result = state
        .engine
        .bind_parameter(
            &context,
            &value_provider,
            &scenario.parameter,
            &mut model_state,
            &cancel,
        )
        .await?;

    debug!(
        scenario = %name,
        is_model_set = result.is_model_set(),
        errors = model_state.error_count(),
        "Scenario bound"
    );

    let status = if model_state.is_valid() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    let body = BindingResponse {
        scenario: name,
        result,
        model_state: ModelStateReport::from(&model_state),
    };

    Ok((status, Json(body)).into_response())
}

/// Binding endpoint errors
#[derive(Debug)]
pub enum BindingError {
    UnknownScenario(String),
    Snapshot(SnapshotError),
    Cancelled,
    Engine(mvc_binding::Error),
}

impl From<SnapshotError> for BindingError {
    fn from(err: SnapshotError) -> Self {
        BindingError::Snapshot(err)
    }
}

impl From<mvc_binding::Error> for BindingError {
    fn from(err: mvc_binding::Error) -> Self {
        match err {
            mvc_binding::Error::Cancelled => BindingError::Cancelled,
            other => BindingError::Engine(other),
        }
    }
}

impl IntoResponse for BindingError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            BindingError::UnknownScenario(name) => {
                (StatusCode::NOT_FOUND, format!("Unknown scenario: {}", name))
            }
            BindingError::Snapshot(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            BindingError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Binding cancelled: server shutting down".to_string(),
            ),
            BindingError::Engine(err) => {
                error!(error = %err, "Binding failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Binding error: {}", err))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
