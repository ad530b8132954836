//! Storage abstractions for the service layer
//!
//! Every backend stores plain `key -> value` strings. The backend is picked
//! once at startup from `lode.storage.type` and shared behind an `Arc`.

pub mod database;
pub mod json_map_store;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use configs::{AppConfig, StorageKind};
use tracing::info;

use crate::errors::ServiceError;

pub use database::DatabaseBackend;
pub use json_map_store::JsonMapStore;
pub use memory::MemoryBackend;

/// Key-value persistence used by the read and write paths.
/// Implementations own their locking; callers never synchronize around them.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Short backend name for logs.
    fn kind(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError>;

    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Build the backend selected by configuration.
pub async fn build_backend(cfg: &AppConfig) -> anyhow::Result<Arc<dyn KvBackend>> {
    let backend: Arc<dyn KvBackend> = match cfg.lode.storage.kind {
        StorageKind::Memory => Arc::new(MemoryBackend::new()),
        StorageKind::File => {
            let path = cfg
                .lode
                .storage
                .path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("lode.storage.path is required for file storage"))?;
            JsonMapStore::<String, String>::new(path).await?
        }
        StorageKind::Database => {
            let db = models::db::connect_and_migrate(&cfg.database).await?;
            Arc::new(DatabaseBackend::new(db))
        }
    };
    info!(storage = backend.kind(), "storage backend ready");
    Ok(backend)
}
