//! Redis-backed container registry.
//!
//! The container management system maintains the authoritative container
//! list as a JSON-encoded array under a single key; this client only ever
//! reads it.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use vigil_core::config::RedisConfig;
use vigil_core::ContainerEntry;

use crate::traits::{ContainerRegistry, RegistryError};

/// Reads the container list from Redis.
pub struct RedisRegistry {
    connection: ConnectionManager,
    containers_key: String,
}

impl RedisRegistry {
    /// Connect to Redis using the configured URL.
    ///
    /// The connection manager reconnects on its own after transient
    /// failures, so one registry value can be shared for the lifetime of
    /// the process.
    pub async fn connect(config: &RedisConfig) -> Result<Self, RegistryError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| RegistryError::Connection(e.to_string()))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| RegistryError::Connection(e.to_string()))?;

        Ok(Self {
            connection,
            containers_key: config.containers_key.clone(),
        })
    }
}

#[async_trait]
impl ContainerRegistry for RedisRegistry {
    async fn list_container_ids(&self) -> Result<Vec<String>, RegistryError> {
        let mut connection = self.connection.clone();

        let value: Option<String> = connection
            .get(&self.containers_key)
            .await
            .map_err(|e| RegistryError::Connection(e.to_string()))?;

        let ids = match value {
            Some(raw) => decode_container_ids(&raw)?,
            None => Vec::new(),
        };

        tracing::debug!(key = %self.containers_key, containers = ids.len(), "registry read");
        Ok(ids)
    }
}

/// Decode the stored JSON array of container entries into bare ids.
fn decode_container_ids(raw: &str) -> Result<Vec<String>, RegistryError> {
    let entries: Vec<ContainerEntry> =
        serde_json::from_str(raw).map_err(|e| RegistryError::Decode(e.to_string()))?;
    Ok(entries.into_iter().map(|entry| entry.container_id).collect())
}
