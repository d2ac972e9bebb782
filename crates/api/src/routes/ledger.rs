//! Ledger routes: balances, report and batch updates.
//!
//! Every response is plain text. Unsupported currencies answer 404, a report
//! requested before all rates are known answers 503, and malformed bodies
//! answer 400.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use fxledger_core::BalanceBatch;
use fxledger_shared::{AppError, AppResult};
use tracing::{debug, info, warn};

use crate::AppState;
use crate::response;

/// Success message for `set` and `modify` batches.
pub const UPDATED_MESSAGE: &str = "balances updated";

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/amount/get", get(get_report))
        .route("/amount/set", post(set_balances))
        .route("/amount/modify", post(modify_balances))
        .route("/{currency}/get", get(get_balance))
}

/// Parses a `{"<code>": <number>, ...}` body.
fn parse_batch(body: &[u8]) -> AppResult<BalanceBatch> {
    serde_json::from_slice(body).map_err(|e| {
        AppError::Validation(format!(
            "request body must be a JSON object of currency amounts: {e}"
        ))
    })
}

/// GET `/amount/get` - Full ledger report.
async fn get_report(State(state): State<AppState>) -> Response {
    match state.service.report().await {
        Ok(report) => {
            info!("Ledger report requested\n{report}");
            response::text(report)
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "Ledger report not available");
            response::error(e)
        }
    }
}

/// GET `/{currency}/get` - Balance of one currency.
async fn get_balance(State(state): State<AppState>, Path(currency): Path<String>) -> Response {
    match state.service.balance(&currency).await {
        Ok(line) => response::text(line),
        Err(e) => {
            debug!(currency = %currency, code = e.error_code(), "Balance lookup failed");
            response::error(e)
        }
    }
}

/// POST `/amount/set` - Overwrite balances.
async fn set_balances(State(state): State<AppState>, body: Bytes) -> Response {
    let batch = match parse_batch(&body) {
        Ok(batch) => batch,
        Err(e) => return response::error(e),
    };
    debug!(?batch, "Set balances request");

    match state.service.set_balances(&batch).await {
        Ok(_) => response::text(UPDATED_MESSAGE),
        Err(e) => response::error(e),
    }
}

/// POST `/amount/modify` - Add deltas to balances.
async fn modify_balances(State(state): State<AppState>, body: Bytes) -> Response {
    let batch = match parse_batch(&body) {
        Ok(batch) => batch,
        Err(e) => return response::error(e),
    };
    debug!(?batch, "Modify balances request");

    match state.service.modify_balances(&batch).await {
        Ok(()) => response::text(UPDATED_MESSAGE),
        Err(e) => response::error(e),
    }
}
