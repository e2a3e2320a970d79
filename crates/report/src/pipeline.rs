//! One report cycle: registry read, window query, boundary probe,
//! aggregation.
//!
//! Shared between the periodic worker and the manual HTTP trigger; both
//! hand the resulting report to a sink themselves.

use chrono::{DateTime, Utc};

use vigil_core::{SortOrder, UptimeReport};
use vigil_notify::DeliveryError;
use vigil_registry::{ContainerRegistry, RegistryError};
use vigil_status::{QueryError, StatusStore};

use crate::aggregate::aggregate;

/// Records fetched per container by the window query. Effectively
/// unbounded for heartbeat-scale data.
pub const WINDOW_QUERY_LIMIT: usize = 10_000;

/// Records fetched per container by the boundary probe: only the earliest
/// record at or after the window end matters.
pub const BOUNDARY_QUERY_LIMIT: usize = 1;

/// Failure of a single report cycle. Terminal for the cycle, never for
/// the worker loop.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Compute the uptime report for `[start, end)`.
///
/// Reads the container list fresh from the registry, fetches the window
/// records and the boundary probe, and aggregates. The probe's upper bound
/// is taken from the clock at call time — records between `end` and now
/// are exactly the ones that resolve state straddling the window edge.
pub async fn compute_report(
    store: &dyn StatusStore,
    registry: &dyn ContainerRegistry,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<UptimeReport, ReportError> {
    let container_ids = registry.list_container_ids().await?;

    let window_records = store
        .fetch(&container_ids, start, end, WINDOW_QUERY_LIMIT, SortOrder::Asc)
        .await?;

    let boundary_records = store
        .fetch(&container_ids, end, Utc::now(), BOUNDARY_QUERY_LIMIT, SortOrder::Asc)
        .await?;

    let stats = aggregate(&window_records, &boundary_records, start, end);

    Ok(UptimeReport {
        container_count: stats.on_count + stats.off_count,
        container_on_count: stats.on_count,
        container_off_count: stats.off_count,
        total_uptime: stats.total_uptime_hours,
        start_time: start,
        end_time: end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    use vigil_core::{ContainerStatus, StatusIndex, StatusRecord};

    struct StubRegistry {
        ids: Vec<String>,
        fail: bool,
    }

    #[async_trait]
    impl ContainerRegistry for StubRegistry {
        async fn list_container_ids(&self) -> Result<Vec<String>, RegistryError> {
            if self.fail {
                return Err(RegistryError::Connection("registry down".to_string()));
            }
            Ok(self.ids.clone())
        }
    }

    /// Serves canned records and captures the limits it was called with.
    struct StubStore {
        window: StatusIndex,
        boundary: StatusIndex,
        calls: Mutex<Vec<usize>>,
        fetch_count: AtomicUsize,
        fail_boundary: bool,
    }

    impl StubStore {
        fn new(window: StatusIndex, boundary: StatusIndex) -> Self {
            Self {
                window,
                boundary,
                calls: Mutex::new(Vec::new()),
                fetch_count: AtomicUsize::new(0),
                fail_boundary: false,
            }
        }
    }

    #[async_trait]
    impl StatusStore for StubStore {
        async fn fetch(
            &self,
            container_ids: &[String],
            _from: DateTime<Utc>,
            _till: DateTime<Utc>,
            limit: usize,
            _order: SortOrder,
        ) -> Result<StatusIndex, QueryError> {
            self.calls.lock().unwrap().push(limit);
            let call = self.fetch_count.fetch_add(1, Ordering::SeqCst);

            if call == 0 {
                let mut index: StatusIndex = container_ids
                    .iter()
                    .map(|id| (id.clone(), Vec::new()))
                    .collect();
                for (id, records) in &self.window {
                    index.insert(id.clone(), records.clone());
                }
                Ok(index)
            } else if self.fail_boundary {
                Err(QueryError::Status(503))
            } else {
                Ok(self.boundary.clone())
            }
        }
    }

    fn record(id: &str, status: ContainerStatus, uptime: i64, at: DateTime<Utc>) -> StatusRecord {
        StatusRecord {
            container_id: id.to_string(),
            status,
            uptime,
            last_updated: at,
            counter: 0,
        }
    }

    fn window_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        (end - Duration::hours(24), end)
    }

    #[tokio::test]
    async fn registered_containers_without_records_default_off() {
        let (start, end) = window_bounds();
        let registry = StubRegistry {
            ids: vec!["c1".to_string(), "c2".to_string()],
            fail: false,
        };
        let store = StubStore::new(StatusIndex::new(), StatusIndex::new());

        let report = compute_report(&store, &registry, start, end).await.unwrap();
        assert_eq!(report.container_count, 2);
        assert_eq!(report.container_on_count, 0);
        assert_eq!(report.container_off_count, 2);
        assert_eq!(report.total_uptime, 0.0);
        assert_eq!(report.start_time, start);
        assert_eq!(report.end_time, end);
    }

    #[tokio::test]
    async fn window_and_boundary_queries_use_their_limits() {
        let (start, end) = window_bounds();
        let registry = StubRegistry {
            ids: vec!["c1".to_string()],
            fail: false,
        };
        let store = StubStore::new(StatusIndex::new(), StatusIndex::new());

        compute_report(&store, &registry, start, end).await.unwrap();

        let calls = store.calls.lock().unwrap();
        assert_eq!(*calls, vec![WINDOW_QUERY_LIMIT, BOUNDARY_QUERY_LIMIT]);
    }

    #[tokio::test]
    async fn boundary_probe_settles_classification() {
        let (start, end) = window_bounds();
        let registry = StubRegistry {
            ids: vec!["c1".to_string()],
            fail: false,
        };

        let window: StatusIndex = HashMap::from([(
            "c1".to_string(),
            vec![record("c1", ContainerStatus::Off, 600, end - Duration::hours(1))],
        )]);
        let boundary: StatusIndex = HashMap::from([(
            "c1".to_string(),
            vec![record("c1", ContainerStatus::On, 7200, end)],
        )]);
        let store = StubStore::new(window, boundary);

        let report = compute_report(&store, &registry, start, end).await.unwrap();
        assert_eq!(report.container_on_count, 1);
        assert_eq!(report.container_off_count, 0);
        assert_eq!(report.total_uptime, 1.0);
    }

    #[tokio::test]
    async fn registry_failure_aborts_before_any_query() {
        let (start, end) = window_bounds();
        let registry = StubRegistry {
            ids: Vec::new(),
            fail: true,
        };
        let store = StubStore::new(StatusIndex::new(), StatusIndex::new());

        let result = compute_report(&store, &registry, start, end).await;
        assert!(matches!(result, Err(ReportError::Registry(_))));
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn boundary_query_failure_propagates() {
        let (start, end) = window_bounds();
        let registry = StubRegistry {
            ids: vec!["c1".to_string()],
            fail: false,
        };
        let mut store = StubStore::new(StatusIndex::new(), StatusIndex::new());
        store.fail_boundary = true;

        let result = compute_report(&store, &registry, start, end).await;
        assert!(matches!(result, Err(ReportError::Query(_))));
    }
}
