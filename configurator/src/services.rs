//! External collaborators
//!
//! The engine never talks to a network or a storage backend itself; hosts plug
//! these traits in. Catalog-side traits live in [`crate::catalog::loader`].

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{RecognitionResult, Submission};
use thiserror::Error;

/// Collaborator error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Parse(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = match &err {
            ServiceError::NotFound(_) => ErrorCode::NotFound,
            ServiceError::Timeout(_) => ErrorCode::Timeout,
            ServiceError::Network(_) | ServiceError::Parse(_) | ServiceError::Rejected(_) => {
                ErrorCode::InternalError
            }
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Result type for collaborator calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Image to hand to recognition and storage
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Object name, e.g. `<sha256>.png`
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// `data:<type>;base64,...` form of `bytes`
    pub data_uri: String,
}

/// AI recognition of an uploaded reference photo
#[async_trait]
pub trait RecognitionService: Send + Sync {
    async fn recognize(&self, image: &ImagePayload) -> ServiceResult<RecognitionResult>;
}

/// Asset storage returning publicly resolvable URLs
#[async_trait]
pub trait AssetStorage: Send + Sync {
    async fn upload(&self, image: &ImagePayload, bucket: &str) -> ServiceResult<String>;
}

/// Order placement
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, submission: &Submission) -> ServiceResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_to_app_error() {
        let err: AppError = ServiceError::Timeout("cache".into()).into();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.message, "Timed out: cache");

        let err: AppError = ServiceError::Network("503".into()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_from_serde_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ServiceError = parse.unwrap_err().into();
        assert!(matches!(err, ServiceError::Parse(_)));
    }
}
