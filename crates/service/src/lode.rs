use std::sync::Arc;

use keyspace::{KeyResolver, ParameterSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::storage::KvBackend;

/// A stored value together with the concrete key it lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Read/write workflow over templated keys.
///
/// The key layout is parsed once at startup and never changes; the service is
/// shared across request handlers behind an `Arc` without further locking.
pub struct LodeService {
    keys: KeyResolver,
    backend: Arc<dyn KvBackend>,
}

impl LodeService {
    pub fn new(keys: KeyResolver, backend: Arc<dyn KvBackend>) -> Self {
        Self { keys, backend }
    }

    /// Parse the configured templates. A malformed template is an error here,
    /// which callers treat as fatal.
    pub fn from_config(cfg: &configs::LodeConfig, backend: Arc<dyn KvBackend>) -> Result<Self, ServiceError> {
        let keys = KeyResolver::from_patterns(&cfg.search, cfg.write_template.as_deref())?;
        Ok(Self::new(keys, backend))
    }

    pub fn keys(&self) -> &KeyResolver {
        &self.keys
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Return the value under the first candidate key that resolves and is
    /// present in the backend. Backend failures abort the search.
    #[instrument(skip_all, fields(storage = self.backend.kind()))]
    pub async fn get(&self, params: &ParameterSet) -> Result<Entry, ServiceError> {
        for key in self.keys.search_list().candidates(params) {
            if let Some(value) = self.backend.get(key.as_str()).await? {
                debug!(%key, "read matched");
                return Ok(Entry { key: key.into_string(), value });
            }
        }
        Err(ServiceError::not_found("key"))
    }

    /// Store `value` under the write template's key. Never searches; a missing
    /// parameter fails the write instead of redirecting it to another key.
    #[instrument(skip_all, fields(storage = self.backend.kind()))]
    pub async fn set(&self, params: &ParameterSet, value: &str) -> Result<Entry, ServiceError> {
        let key = self.keys.resolve_for_write(params)?;
        self.backend.set(key.as_str(), value).await?;
        info!(%key, "value stored");
        Ok(Entry { key: key.into_string(), value: value.to_string() })
    }
}
