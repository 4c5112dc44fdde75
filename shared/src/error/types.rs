//! Error types

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type of the configurator, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages (shown inline by the wizard)
/// - Optional structured details (offending group, attribute, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a string detail
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.as_ref()?.get(key)?.as_str()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a required-field error naming the group and the attribute
    pub fn required_field(group: impl Into<String>, attribute: impl Into<String>) -> Self {
        let group = group.into();
        let attribute = attribute.into();
        Self::with_message(
            ErrorCode::RequiredField,
            format!("Please fill in \"{}\" for \"{}\"", attribute, group),
        )
        .with_detail("group", group)
        .with_detail("attribute", attribute)
    }

    /// Create an unknown-group error
    pub fn group_not_found(group_key: impl Into<String>) -> Self {
        let key = group_key.into();
        Self::with_message(ErrorCode::GroupNotFound, format!("Option group {} not found", key))
            .with_detail("group", key)
    }

    /// Create a recognition failure error
    pub fn recognition(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RecognitionFailed, msg)
    }

    /// Create an invalid image error
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ImageInvalid, msg)
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::CatalogUnavailable);
        assert_eq!(err.code, ErrorCode::CatalogUnavailable);
        assert_eq!(err.message, "Cannot load options");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("bad").with_detail("field", "color");
        assert_eq!(err.detail_str("field"), Some("color"));
        assert_eq!(err.detail_str("missing"), None);
    }

    #[test]
    fn test_required_field_names_group_and_attribute() {
        let err = AppError::required_field("Pro3 標準版", "材質");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(err.message.contains("Pro3 標準版"));
        assert!(err.message.contains("材質"));
        assert_eq!(err.detail_str("group"), Some("Pro3 標準版"));
        assert_eq!(err.detail_str("attribute"), Some("材質"));
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::group_not_found("case");
        assert_eq!(format!("{}", err), "Option group case not found");
    }

    #[test]
    fn test_from_code() {
        let err: AppError = ErrorCode::Timeout.into();
        assert_eq!(err.message, "Operation timed out");
    }
}
