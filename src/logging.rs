//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};

/// How many bytes of a body to include in an info-level log line.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both are logged at the `info` level. Bodies longer than
/// [LOG_BODY_LENGTH_LIMIT] bytes are truncated, with the full body
/// logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();

    log_body("Received request", &format!("{} {}", parts.method, parts.uri), &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();

    log_body("Sending response", &format!("{}", parts.status), &body_text);

    Response::from_parts(parts, body_text.into())
}

fn log_body(prefix: &str, summary: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let truncated = truncate_on_char_boundary(body, LOG_BODY_LENGTH_LIMIT);
        tracing::info!("{prefix}: {summary} body: {truncated}...");
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{prefix}: {summary} body: {body:?}");
    }
}

/// Truncate to at most `limit` bytes without splitting a multi-byte
/// character.
fn truncate_on_char_boundary(body: &str, limit: usize) -> &str {
    let mut end = limit.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
