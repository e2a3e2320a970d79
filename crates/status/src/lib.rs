//! Status store client for container ON/OFF history.
//!
//! This crate provides:
//! - `StatusStore` trait, the query seam the report pipeline depends on
//! - `OpenSearchStore`, a reqwest implementation speaking the
//!   OpenSearch/Elasticsearch `_msearch` batched multi-query protocol
//! - NDJSON query construction for per-container window queries

pub mod opensearch;
pub mod query;
pub mod traits;

pub use opensearch::OpenSearchStore;
pub use traits::{QueryError, StatusStore};
