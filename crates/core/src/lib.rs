//! Core ledger logic for FxLedger.
//!
//! This crate contains the concurrent state-and-notification engine with ZERO
//! web dependencies: the shared ledger, the coalescing change signal and the
//! notifier loop that drains it.
//!
//! # Modules
//!
//! - `ledger` - Balance/rate table, report rendering and the shared service
//! - `signal` - Coalescing change signal between mutators and the notifier
//! - `notifier` - Background loop rendering a report after changes

pub mod ledger;
pub mod notifier;
pub mod signal;

pub use ledger::{BalanceBatch, CurrencyState, Ledger, LedgerError, LedgerService, RateQuote};
pub use notifier::{NotifierLoop, ReportSink, StdoutSink};
pub use signal::{ChangeKind, ChangeSet, ChangeSignal};
