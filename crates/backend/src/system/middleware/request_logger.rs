use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::human_size;

/// Access log line per request. Server errors are logged at `warn`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let status = parts.status.as_u16();

    // buffered to report the real payload size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(%method, %path, status, "response body could not be read: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let size = human_size(bytes.len());
    if parts.status.is_server_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, %size, "request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, %size, "request");
    }

    Response::from_parts(parts, Body::from(bytes))
}
