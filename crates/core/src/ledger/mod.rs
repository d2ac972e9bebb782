//! Multi-currency balance ledger.
//!
//! This module implements the shared ledger state:
//! - The balance/rate table and its invariant-preserving mutators
//! - Rate quotes produced by one fetch cycle
//! - The plain-text report and cross-rate rendering
//! - Error types for ledger operations
//! - The lock-guarded service used by handlers and background loops

pub mod book;
pub mod error;
pub mod quote;
pub mod report;
pub mod service;

#[cfg(test)]
mod props;

pub use book::{BalanceBatch, CurrencyState, Ledger};
pub use error::LedgerError;
pub use quote::RateQuote;
pub use report::CrossRate;
pub use service::LedgerService;
