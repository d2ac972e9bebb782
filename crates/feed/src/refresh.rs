//! Periodic refresh of foreign exchange rates.
//!
//! Each cycle fetches a quote without holding the ledger lock, merges it under
//! the lock, then sleeps for the configured period. A failed cycle is logged
//! and the loop carries on with the next one; there is no backoff.

use std::time::Duration;

use fxledger_core::LedgerService;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::FeedError;
use crate::fetcher::RateFetcher;

/// Background task keeping ledger rates fresh.
#[derive(Debug, Clone)]
pub struct RefreshLoop {
    fetcher: RateFetcher,
    service: LedgerService,
    period: Duration,
}

impl RefreshLoop {
    /// Creates a loop refreshing every `period`.
    #[must_use]
    pub const fn new(fetcher: RateFetcher, service: LedgerService, period: Duration) -> Self {
        Self {
            fetcher,
            service,
            period,
        }
    }

    /// Runs a single fetch-and-merge cycle.
    ///
    /// Returns whether any rate changed.
    pub async fn refresh_once(&self) -> Result<bool, FeedError> {
        let codes = self.service.foreign_codes().await;
        let quote = self.fetcher.fetch(&codes).await?;
        if quote.is_empty() {
            warn!(url = %self.fetcher.url(), "Rate source returned none of the configured currencies");
            return Ok(false);
        }

        info!(currencies = quote.len(), "Exchange rates fetched");
        Ok(self.service.apply_quote(&quote).await)
    }

    /// Runs until `cancel` fires. Fetches first, then sleeps.
    ///
    /// Cancellation only lands on await points, and the merge has none, so
    /// the ledger is never left half-updated.
    pub async fn run(self, cancel: CancellationToken) {
        info!(period_secs = self.period.as_secs(), url = %self.fetcher.url(), "Rate refresh started");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                result = self.refresh_once() => {
                    if let Err(e) = result {
                        error!(error = %e, code = e.error_code(), "Rate refresh failed");
                    }
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.period) => {}
            }
        }
        info!("Rate refresh stopped");
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
