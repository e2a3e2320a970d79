//! Container registry client.
//!
//! The set of containers to report on lives outside this service, as a
//! JSON array of `{container_id, status}` entries under a fixed Redis key.
//! This crate provides:
//! - `ContainerRegistry` trait, the seam the report pipeline depends on
//! - `RedisRegistry`, the Redis-backed implementation

pub mod redis_registry;
pub mod traits;

pub use redis_registry::RedisRegistry;
pub use traits::{ContainerRegistry, RegistryError};
