//! Exchange rate feed for FxLedger.
//!
//! This crate provides:
//! - `RateFetcher`, a client for the upstream daily rates endpoint
//! - `RefreshLoop`, the background task merging fresh rates into the ledger

pub mod error;
pub mod fetcher;
pub mod refresh;

pub use error::FeedError;
pub use fetcher::{RateFetcher, parse_quote};
pub use refresh::RefreshLoop;
