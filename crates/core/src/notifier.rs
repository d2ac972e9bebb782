//! Notifier loop: renders a report after the ledger changed.
//!
//! On a fixed cadence the loop drains at most one pending indication from the
//! [`ChangeSignal`](crate::signal::ChangeSignal) and, if there was one, emits a
//! full ledger report. Render failures are logged and never stop the loop.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::ledger::LedgerService;

/// Destination for rendered change reports.
pub trait ReportSink: Send + Sync + 'static {
    /// Emits one rendered report.
    fn emit(&self, report: &str);
}

/// Writes reports to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, report: &str) {
        println!("{report}");
    }
}

/// Background task reporting ledger changes.
pub struct NotifierLoop<S> {
    service: LedgerService,
    sink: S,
    interval: Duration,
}

impl<S: ReportSink> NotifierLoop<S> {
    /// Creates a notifier checking the signal every `interval`.
    pub fn new(service: LedgerService, sink: S, interval: Duration) -> Self {
        Self {
            service,
            sink,
            interval,
        }
    }

    /// Drains one pending change and emits the report.
    ///
    /// Returns the emitted report, or `None` when nothing was pending or the
    /// report could not be rendered.
    pub async fn drain_once(&self) -> Option<String> {
        let changes = self.service.signal().take()?;
        match self.service.report().await {
            Ok(report) => {
                debug!(%changes, "Emitting ledger report");
                self.sink.emit(&report);
                Some(report)
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), %changes, "Failed to render change report");
                None
            }
        }
    }

    /// Runs until `cancel` fires. Sleeps first, then drains.
    pub async fn run(self, cancel: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Notifier started");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
            self.drain_once().await;
        }
        info!("Notifier stopped");
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}
