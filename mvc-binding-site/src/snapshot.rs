//! Request snapshots
//!
//! Copies everything the engine may read out of an axum request into an
//! immutable [`RequestContext`]. Form fields are not parsed here; the
//! context decodes a urlencoded body itself when the content type says so.

use axum::body::{to_bytes, Body};
use axum::http::Request;
use mvc_binding::RequestContext;
use tracing::debug;

/// Largest request body read into a snapshot
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Snapshot failure
#[derive(Debug)]
pub enum SnapshotError {
    /// Body could not be read or exceeded [`MAX_BODY_BYTES`]
    Body(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Body(msg) => write!(f, "Failed to read request body: {}", msg),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Capture query, headers, route values and body
pub async fn capture(
    request: Request<Body>,
    route_values: &[(&str, &str)],
) -> Result<RequestContext, SnapshotError> {
    let (parts, body) = request.into_parts();
    let mut context = RequestContext::new();

    if let Some(query) = parts.uri.query() {
        context = context.with_query_string(query);
    }

    for (name, value) in parts.headers.iter() {
        match value.to_str() {
            Ok(value) => context = context.with_header(name.as_str(), value),
            Err(_) => debug!(header = %name, "Skipping non-ASCII header value"),
        }
    }

    for (key, value) in route_values {
        context = context.with_route_value(*key, *value);
    }

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| SnapshotError::Body(e.to_string()))?;
    if !bytes.is_empty() {
        context = context.with_body(bytes.to_vec());
    }

    Ok(context)
}
