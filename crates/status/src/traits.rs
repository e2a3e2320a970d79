//! Status store trait definition and query error type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vigil_core::{SortOrder, StatusIndex};

/// Errors from querying the status store.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status store returned HTTP {0}")]
    Status(u16),

    #[error("failed to decode status store response: {0}")]
    Decode(String),
}

/// Abstraction over the status store query executor.
///
/// The report pipeline only depends on this trait, keeping it free of any
/// particular search backend. `OpenSearchStore` implements it over HTTP.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Fetch status records for the given containers in `[from, till)`.
    ///
    /// `limit` caps the records returned PER CONTAINER: the store executes
    /// one sub-query per id, each with its own size, so a boundary probe
    /// with `limit = 1` yields at most one record for every container
    /// rather than one record total. Records are sorted by `counter` in
    /// the given order.
    ///
    /// The returned index contains every requested id as a key; containers
    /// with no matching records map to an empty Vec.
    async fn fetch(
        &self,
        container_ids: &[String],
        from: DateTime<Utc>,
        till: DateTime<Utc>,
        limit: usize,
        order: SortOrder,
    ) -> Result<StatusIndex, QueryError>;
}
