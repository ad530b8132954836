use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::KvBackend;
use crate::errors::ServiceError;

/// SeaORM-backed store over the `lode_entry` table.
pub struct DatabaseBackend {
    pub db: DatabaseConnection,
}

impl DatabaseBackend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvBackend for DatabaseBackend {
    fn kind(&self) -> &'static str {
        "database"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let row = models::entry::find(&self.db, key).await?;
        Ok(row.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        models::entry::upsert(&self.db, key, value).await?;
        Ok(())
    }
}
