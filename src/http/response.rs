//! Response post-processing.
//!
//! # Responsibilities
//! - Set `Location` on successful create/update responses
//! - Give timeout responses the uniform error body
//!
//! # States
//! ```text
//! pass-through: handler still running, request forwarded untouched
//! decorated:    2xx response, body carries `id` or `data.id`
//!               → Location: {base}/{id}
//! ```
//!
//! # Design Decisions
//! - Error responses are never inspected
//! - The body is buffered and forwarded byte-for-byte
//! - No id in the body: header omitted, warning logged

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::ApiError;

/// Identifier of an envelope body: top-level `id`, else `data.id`.
pub fn envelope_id(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let id = value
        .get("id")
        .or_else(|| value.get("data").and_then(|data| data.get("id")))?;

    match id {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Middleware: `from_fn_with_state(base_path, location_header)`.
pub async fn location_header(State(base): State<String>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::Internal(format!("failed to buffer response: {e}")).into_response(),
    };

    match envelope_id(&bytes) {
        Some(id) => match HeaderValue::from_str(&format!("{}/{}", base.trim_end_matches('/'), id)) {
            Ok(value) => {
                parts.headers.insert(LOCATION, value);
            }
            Err(_) => tracing::warn!(base = %base, id = %id, "Location is not a valid header value"),
        },
        None => tracing::warn!(base = %base, "Response carries no id, Location omitted"),
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Middleware layered outside `TimeoutLayer`, whose 408 has an empty body.
pub async fn timeout_body(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request timed out");
        return ApiError::RequestTimeout.into_response();
    }
    response
}
