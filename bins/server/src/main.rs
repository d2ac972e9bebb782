//! FxLedger Server
//!
//! Main entry point: serves the ledger over HTTP while the rate refresh and
//! notifier loops run in the background.

mod cli;

use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxledger_api::{AppState, create_router};
use fxledger_core::{Ledger, LedgerService, NotifierLoop, StdoutSink};
use fxledger_feed::{RateFetcher, RefreshLoop};
use fxledger_shared::AppConfig;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.debug {
        "fxledger=debug,tower_http=debug"
    } else {
        "fxledger=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Build the ledger
    let ledger = Ledger::new(Cli::BASE, cli.balances())?;
    info!(
        base = ledger.base(),
        currencies = ledger.codes().count(),
        debug = cli.debug,
        "Ledger configured"
    );
    let service = LedgerService::new(ledger);

    // Background loops
    let cancel = CancellationToken::new();
    let fetcher = RateFetcher::from_config(&config.rates)?;
    let refresh = RefreshLoop::new(fetcher, service.clone(), Duration::from_secs(cli.period))
        .spawn(cancel.clone());
    let notifier = NotifierLoop::new(service.clone(), StdoutSink, config.notifier.interval())
        .spawn(cancel.clone());

    // Create router
    let app = create_router(AppState::new(service, cli.debug));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    for (name, handle) in [("refresh", refresh), ("notifier", notifier)] {
        if let Err(e) = handle.await {
            warn!(task = name, error = %e, "Background task ended abnormally");
        }
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
