use thiserror::Error;

use keyspace::KeyError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }

    /// True for failures caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Key(_)
                | ServiceError::Validation(_)
                | ServiceError::NotFound(_)
                | ServiceError::Model(models::errors::ModelError::Validation(_))
        )
    }
}
