//! Debug-mode request logging.

use axum::{
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use tracing::info;

use crate::AppState;

/// Logs every inbound request when the service runs in debug mode.
///
/// Outside debug mode requests pass through untouched.
pub async fn debug_log_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.debug {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let uri = request.uri().clone();
    let content_length = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("0")
        .to_string();

    let response = next.run(request).await;
    info!(
        %method,
        %uri,
        content_length = %content_length,
        status = response.status().as_u16(),
        "Request handled"
    );
    response
}
