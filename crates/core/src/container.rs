use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ON/OFF state of a tracked container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerStatus {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerStatus::On => write!(f, "ON"),
            ContainerStatus::Off => write!(f, "OFF"),
        }
    }
}

/// A container id paired with its last known status, as stored in the
/// registry under the containers key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEntry {
    pub container_id: String,
    pub status: ContainerStatus,
}

/// One status observation from the status store.
///
/// `uptime` is the number of seconds the container has held `status` as of
/// `last_updated` — not the gap to the next record. Records for one
/// container arrive sorted by `counter` in the order requested from the
/// store; nothing here re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub container_id: String,
    pub status: ContainerStatus,
    pub uptime: i64,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub counter: i64,
}

/// Per-container status records returned by one store query.
///
/// Every requested container id is present as a key; containers without
/// hits map to an empty Vec so downstream classification still sees them.
pub type StatusIndex = HashMap<String, Vec<StatusRecord>>;

/// Sort direction for store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
