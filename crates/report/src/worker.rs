//! Periodic report worker.
//!
//! One background tokio task owns the tick loop; every tick reports on the
//! window that just elapsed. Ticks run strictly sequentially — the next
//! tick cannot start before the previous cycle, delivery included, has
//! finished, because the loop body awaits the whole cycle inline.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info};

use vigil_notify::ReportSink;
use vigil_registry::ContainerRegistry;
use vigil_status::StatusStore;

use crate::pipeline::compute_report;

/// Drives the report pipeline on a fixed interval until stopped.
///
/// The interval doubles as the report window length: a tick at time `t`
/// reports on `[t - interval, t)`.
pub struct ReportWorker {
    store: Arc<dyn StatusStore>,
    registry: Arc<dyn ContainerRegistry>,
    sink: Arc<dyn ReportSink>,
    interval: Duration,
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl ReportWorker {
    pub fn new(
        store: Arc<dyn StatusStore>,
        registry: Arc<dyn ContainerRegistry>,
        sink: Arc<dyn ReportSink>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            registry,
            sink,
            interval,
            shutdown: Arc::new(Notify::new()),
            handle: None,
        }
    }

    /// Spawn the tick loop.
    ///
    /// Calling `start` again without an intervening `stop` abandons the
    /// previous loop's handle; callers own that ordering.
    pub fn start(&mut self) {
        let store = self.store.clone();
        let registry = self.registry.clone();
        let sink = self.sink.clone();
        let interval = self.interval;
        let shutdown = self.shutdown.clone();

        self.handle = Some(tokio::spawn(async move {
            run_loop(store, registry, sink, interval, shutdown).await;
        }));
    }

    /// Request cancellation and wait for the loop to exit.
    ///
    /// Returns only once the task has terminated, so no report is sent
    /// after `stop` returns. A tick already in flight finishes its cycle
    /// first; cancellation is observed at the next tick boundary.
    pub async fn stop(&mut self) {
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "report worker task failed");
            }
        }
    }
}

async fn run_loop(
    store: Arc<dyn StatusStore>,
    registry: Arc<dyn ContainerRegistry>,
    sink: Arc<dyn ReportSink>,
    interval: Duration,
    shutdown: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(interval);
    // Skip the immediate first tick: no full window has elapsed yet.
    ticker.tick().await;

    info!(interval_secs = interval.as_secs(), "report worker started");

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("report worker stopped");
                return;
            }
            _ = ticker.tick() => {
                run_cycle(&*store, &*registry, &*sink, interval).await;
            }
        }
    }
}

/// One tick: compute the report for the window that just elapsed and hand
/// it to the sink. Every failure is terminal for this cycle only.
async fn run_cycle(
    store: &dyn StatusStore,
    registry: &dyn ContainerRegistry,
    sink: &dyn ReportSink,
    interval: Duration,
) {
    let window_end = Utc::now();
    let window_start = window_end - chrono::Duration::seconds(interval.as_secs() as i64);

    let report = match compute_report(store, registry, window_start, window_end).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "report cycle abandoned");
            return;
        }
    };

    if let Err(e) = sink.deliver(&report).await {
        error!(error = %e, "failed to deliver report");
        return;
    }

    info!(
        containers = report.container_count,
        on = report.container_on_count,
        off = report.container_off_count,
        uptime_hours = report.total_uptime,
        "report cycle completed"
    );
}
