//! Ledger service shared by request handlers and background loops.
//!
//! Every operation takes the ledger lock for exactly one logical step, so a
//! reader never observes a half-applied batch or merge. Balance and rate
//! changes raise the [`ChangeSignal`] after the lock is released.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::book::{BalanceBatch, Ledger};
use super::error::LedgerError;
use super::quote::RateQuote;
use crate::signal::{ChangeKind, ChangeSignal};

/// Cloneable handle to the shared ledger and its change signal.
#[derive(Debug, Clone)]
pub struct LedgerService {
    ledger: Arc<RwLock<Ledger>>,
    signal: Arc<ChangeSignal>,
}

impl LedgerService {
    /// Wraps a freshly configured ledger.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            signal: Arc::new(ChangeSignal::new()),
        }
    }

    /// The change signal raised by this service.
    #[must_use]
    pub fn signal(&self) -> &ChangeSignal {
        &self.signal
    }

    /// Foreign currency codes, in insertion order.
    pub async fn foreign_codes(&self) -> Vec<String> {
        self.ledger
            .read()
            .await
            .foreign_codes()
            .map(str::to_string)
            .collect()
    }

    /// Returns true once every foreign currency has a rate.
    pub async fn rates_ready(&self) -> bool {
        self.ledger.read().await.rates_ready()
    }

    /// Copy of the current ledger state.
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.read().await.clone()
    }

    /// `"<code>: <balance>"` for one currency.
    pub async fn balance(&self, code: &str) -> Result<String, LedgerError> {
        self.ledger.read().await.render_balance(code)
    }

    /// The full plain-text report.
    pub async fn report(&self) -> Result<String, LedgerError> {
        self.ledger.read().await.render_report()
    }

    /// Overwrites balances for every currency in `batch`.
    ///
    /// The batch is applied atomically; an unknown currency rejects all of it.
    /// Returns whether any balance changed.
    pub async fn set_balances(&self, batch: &BalanceBatch) -> Result<bool, LedgerError> {
        let changed = self.ledger.write().await.set_balances(batch)?;
        if changed {
            self.signal.notify(ChangeKind::BalanceSet);
        }
        debug!(currencies = batch.len(), changed, "Balances set");
        Ok(changed)
    }

    /// Adds deltas for every currency in `batch`.
    ///
    /// The batch is applied atomically and always counts as a change.
    pub async fn modify_balances(&self, batch: &BalanceBatch) -> Result<(), LedgerError> {
        self.ledger.write().await.modify_balances(batch)?;
        self.signal.notify(ChangeKind::BalanceModified);
        debug!(currencies = batch.len(), "Balances modified");
        Ok(())
    }

    /// Merges a fetched quote and raises the signal if any rate moved.
    pub async fn apply_quote(&self, quote: &RateQuote) -> bool {
        let changed = self.ledger.write().await.merge_rates(quote);
        if changed {
            self.signal.notify(ChangeKind::RateChanged);
            info!(currencies = quote.len(), "Exchange rates changed");
        }
        changed
    }
}
