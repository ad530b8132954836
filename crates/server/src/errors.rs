use axum::extract::rejection::{FormRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use keyspace::KeyError;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// Request failure rendered as `{"error": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Key(KeyError::Unbound { name }) => {
                Self::bad_request(format!("missing required parameter `{name}`"))
            }
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "key not found"),
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                Self::bad_request(msg)
            }
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

// 提取器拒绝（如 Content-Type 不对）也返回 {"error"} JSON，而不是纯文本
impl From<FormRejection> for ApiError {
    fn from(e: FormRejection) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        } else {
            debug!(status = %self.status, error = %self.message, "request rejected");
        }
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_statuses() {
        let unbound = ApiError::from(ServiceError::Key(KeyError::Unbound { name: "region".into() }));
        assert_eq!(unbound.status, StatusCode::BAD_REQUEST);
        assert!(unbound.message.contains("region"));

        let missing = ApiError::from(ServiceError::not_found("key"));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let too_long = ApiError::from(ServiceError::Model(ModelError::Validation("key too long".into())));
        assert_eq!(too_long.status, StatusCode::BAD_REQUEST);

        let backend = ApiError::from(ServiceError::Storage("disk full".into()));
        assert_eq!(backend.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(backend.message.contains("disk full"));
    }

    #[tokio::test]
    async fn extractor_rejections_render_as_json() {
        let err = ApiError::from(FormRejection::from(
            axum::extract::rejection::InvalidFormContentType::default(),
        ));
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().is_some_and(|m| m.contains("Content-Type")));
    }
}
