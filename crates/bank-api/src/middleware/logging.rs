use std::time::Instant;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use bank_shared::utils::mask_sensitive;
use tracing::{debug, enabled, info, warn, Level};

use crate::error::ApiError;

const MAX_LOGGED_BODY: usize = 64 * 1024;

/// Access log. At debug level JSON bodies are logged with secrets masked.
pub async fn log_requests(request: Request, next: Next) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let request = if enabled!(Level::DEBUG) && is_json(&request) && fits_log_limit(&request) {
        log_body(request).await?
    } else {
        request
    };

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "Request handled");
    }

    Ok(response)
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Only bodies with a known length under the cap are buffered; others pass through untouched.
fn fits_log_limit(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok())
        .is_some_and(|length| length <= MAX_LOGGED_BODY)
}

async fn log_body(request: Request) -> Result<Request, ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|_| ApiError::BadRequest("Corps de requête illisible.".to_string()))?;

    if let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(&bytes) {
        mask_sensitive(&mut value);
        debug!(body = %value, "Request body");
    }

    Ok(Request::from_parts(parts, Body::from(bytes)))
}
