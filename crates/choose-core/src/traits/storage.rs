//! Object store port for uploaded media

use async_trait::async_trait;

use crate::error::DomainError;

/// Flat byte namespace addressed by generated names.
///
/// Stored media is referenced from polls and options by name only, without
/// referential integrity.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `name`, replacing any previous content
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError>;

    async fn exists(&self, name: &str) -> Result<bool, DomainError>;

    /// Remove `name`; removing a missing name is not an error
    async fn delete(&self, name: &str) -> Result<(), DomainError>;

    /// Read the bytes stored under `name`, `MediaNotFound` if there are none
    async fn open(&self, name: &str) -> Result<Vec<u8>, DomainError>;

    /// Public URL the stored object is served from
    fn url(&self, name: &str) -> String;
}
