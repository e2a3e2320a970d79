//! vigil-server — container uptime report service.
//!
//! Wires the status store, the container registry, and the email sink
//! into the periodic report worker, and serves the HTTP surface
//! (`/health`, manual `POST /report`) until shutdown.

mod api;
mod router;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use vigil_core::config::load_dotenv;
use vigil_core::Config;
use vigil_notify::{EmailReportSink, ReportSink};
use vigil_registry::{ContainerRegistry, RedisRegistry};
use vigil_report::ReportWorker;
use vigil_status::{OpenSearchStore, StatusStore};

use crate::router::router;
use crate::state::AppState;

/// vigil-server — periodic container uptime reports.
#[derive(Parser, Debug)]
#[command(name = "vigil-server", version, about)]
struct Cli {
    /// Validate configuration and exit without starting the service.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    config.validate()?;

    if cli.check_config {
        info!("configuration OK");
        return Ok(());
    }

    config.log_summary();

    let store: Arc<dyn StatusStore> = Arc::new(OpenSearchStore::from_config(&config.status_store)?);
    let registry: Arc<dyn ContainerRegistry> = Arc::new(RedisRegistry::connect(&config.redis).await?);
    let sink: Arc<dyn ReportSink> =
        Arc::new(EmailReportSink::from_config(&config.smtp, &config.report.email_to)?);

    let mut worker = ReportWorker::new(
        store.clone(),
        registry.clone(),
        sink,
        Duration::from_secs(config.report.interval_hours * 3600),
    );
    worker.start();

    let state = Arc::new(AppState {
        store,
        registry,
        smtp: config.smtp.clone(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "vigil server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down report worker");
    worker.stop().await;
    info!("vigil server stopped");

    Ok(())
}

/// Wait for SIGINT or SIGTERM (Unix) or Ctrl+C (cross-platform fallback).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to register SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM");
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl_c");
    }
}
