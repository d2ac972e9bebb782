//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Ledger routes (`/amount/get`, `/{currency}/get`, `/amount/set`, `/amount/modify`)
//! - Health check route
//! - Debug request logging middleware
//! - Plain-text error responses

pub mod middleware;
pub mod response;
pub mod routes;

use axum::{Router, middleware::from_fn_with_state};
use fxledger_core::LedgerService;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared ledger and its change signal.
    pub service: LedgerService,
    /// Log every inbound request with its payload summary.
    pub debug: bool,
}

impl AppState {
    /// Creates the handler state.
    #[must_use]
    pub const fn new(service: LedgerService, debug: bool) -> Self {
        Self { service, debug }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::debug_log::debug_log_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
