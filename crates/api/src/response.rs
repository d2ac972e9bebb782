//! Plain-text responses for the ledger endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fxledger_shared::AppError;

/// Plain-text body with status 200.
pub fn text(body: impl Into<String>) -> Response {
    (StatusCode::OK, body.into()).into_response()
}

/// Plain-text error body with the status mapped from the error.
pub fn error(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.message().to_string()).into_response()
}
