// src/logging_middleware.rs
//! Middleware for logging requests and, in debug mode, JSON response bodies

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, Level};

use crate::common::helpers::mask_access_tokens;

/// Logs method, uri, status and latency of every request.
///
/// With debug logging enabled, JSON response bodies are logged as well, with
/// `access_token` values masked.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let method = request.method().clone();
    let uri = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if !is_json || !tracing::enabled!(Level::DEBUG) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Ok(mut json) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        mask_access_tokens(&mut json);
        debug!(
            status = %parts.status,
            response_body = %json,
            "📤 Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
