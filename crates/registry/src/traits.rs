//! Registry trait definition and error type.

use async_trait::async_trait;

/// Errors from reading the container registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry connection failed: {0}")]
    Connection(String),

    #[error("failed to decode registry value: {0}")]
    Decode(String),
}

/// Source of the container ids to report on.
///
/// Callers read it fresh each report cycle; implementations must not
/// require the caller to hold any long-lived mutable state.
#[async_trait]
pub trait ContainerRegistry: Send + Sync {
    /// List the ids of all known containers, in stored order.
    ///
    /// An absent registry entry means "no containers yet" and yields an
    /// empty list, not an error.
    async fn list_container_ids(&self) -> Result<Vec<String>, RegistryError>;
}
