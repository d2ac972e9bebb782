//! Ledger error types for lookup, readiness and configuration errors.

use fxledger_shared::AppError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Lookup Errors ==========
    /// Currency is not configured in this ledger.
    #[error("{0} is not supported")]
    UnknownCurrency(String),

    /// A batch names the same currency more than once.
    #[error("{0} appears more than once in the batch")]
    DuplicateCurrency(String),

    // ========== Readiness Errors ==========
    /// At least one foreign currency has no rate yet.
    #[error("rates are not available yet for: {}", .0.join(", "))]
    RatesNotReady(Vec<String>),

    // ========== Arithmetic Errors ==========
    /// A balance or total left the representable decimal range.
    #[error("amount out of range for {0}")]
    Overflow(String),

    // ========== Configuration Errors ==========
    /// The initial currency set is not a valid ledger.
    #[error("invalid ledger configuration: {0}")]
    InvalidConfiguration(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::DuplicateCurrency(_) => "DUPLICATE_CURRENCY",
            Self::RatesNotReady(_) => "RATES_NOT_READY",
            Self::Overflow(_) => "AMOUNT_OUT_OF_RANGE",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownCurrency(_) => Self::NotFound(err.to_string()),
            LedgerError::RatesNotReady(_) => Self::Unavailable(err.to_string()),
            LedgerError::DuplicateCurrency(_)
            | LedgerError::Overflow(_)
            | LedgerError::InvalidConfiguration(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}
