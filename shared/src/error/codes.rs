//! Unified error codes for the case configurator
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors
//! - 7xxx: Recognition errors
//! - 8xxx: Submission errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the UI layer can map them
/// to localized messages without parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 6xxx: Catalog ====================
    /// Option catalog could not be loaded (or is empty)
    CatalogUnavailable = 6001,
    /// Option group not found
    GroupNotFound = 6002,
    /// Option item not found
    ItemNotFound = 6003,
    /// Sub-attribute not found
    AttributeNotFound = 6004,
    /// Option item is not available for the configured product
    ItemNotAvailable = 6005,
    /// Option group is not eligible under the current selection
    GroupNotEligible = 6006,

    // ==================== 7xxx: Recognition ====================
    /// Recognition service call failed
    RecognitionFailed = 7001,
    /// Recognition result belongs to a superseded upload
    RecognitionStale = 7002,
    /// Recognition needs a drilled-into group
    NoActiveGroup = 7003,
    /// Uploaded image could not be decoded or has an unsupported format
    ImageInvalid = 7004,
    /// Uploaded image exceeds the size limit
    ImageTooLarge = 7005,

    // ==================== 8xxx: Submission ====================
    /// No base specification has been chosen
    SpecificationMissing = 8001,
    /// Submission sink rejected the order
    SubmissionFailed = 8002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Asset storage error
    StorageError = 9002,
    /// Operation timed out
    Timeout = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Catalog
            ErrorCode::CatalogUnavailable => "Cannot load options",
            ErrorCode::GroupNotFound => "Option group not found",
            ErrorCode::ItemNotFound => "Option item not found",
            ErrorCode::AttributeNotFound => "Attribute not found",
            ErrorCode::ItemNotAvailable => "Option is not available for this product",
            ErrorCode::GroupNotEligible => "Option group is not available for the current selection",

            // Recognition
            ErrorCode::RecognitionFailed => "Image recognition failed",
            ErrorCode::RecognitionStale => "Recognition result is outdated",
            ErrorCode::NoActiveGroup => "No specification is being edited",
            ErrorCode::ImageInvalid => "Invalid image",
            ErrorCode::ImageTooLarge => "Image is too large",

            // Submission
            ErrorCode::SpecificationMissing => "Please choose a specification first",
            ErrorCode::SubmissionFailed => "Order submission failed",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::Timeout => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Catalog
            6001 => Ok(ErrorCode::CatalogUnavailable),
            6002 => Ok(ErrorCode::GroupNotFound),
            6003 => Ok(ErrorCode::ItemNotFound),
            6004 => Ok(ErrorCode::AttributeNotFound),
            6005 => Ok(ErrorCode::ItemNotAvailable),
            6006 => Ok(ErrorCode::GroupNotEligible),

            // Recognition
            7001 => Ok(ErrorCode::RecognitionFailed),
            7002 => Ok(ErrorCode::RecognitionStale),
            7003 => Ok(ErrorCode::NoActiveGroup),
            7004 => Ok(ErrorCode::ImageInvalid),
            7005 => Ok(ErrorCode::ImageTooLarge),

            // Submission
            8001 => Ok(ErrorCode::SpecificationMissing),
            8002 => Ok(ErrorCode::SubmissionFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::Timeout),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::RequiredField.code(), 7);
        assert_eq!(ErrorCode::CatalogUnavailable.code(), 6001);
        assert_eq!(ErrorCode::ItemNotAvailable.code(), 6005);
        assert_eq!(ErrorCode::RecognitionStale.code(), 7002);
        assert_eq!(ErrorCode::SpecificationMissing.code(), 8001);
        assert_eq!(ErrorCode::Timeout.code(), 9003);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::RecognitionFailed.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(2), Ok(ErrorCode::ValidationFailed));
        assert_eq!(ErrorCode::try_from(6003), Ok(ErrorCode::ItemNotFound));
        assert_eq!(ErrorCode::try_from(7005), Ok(ErrorCode::ImageTooLarge));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4), Err(InvalidErrorCode(4)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NoActiveGroup).unwrap();
        assert_eq!(json, "7003");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("8002").unwrap();
        assert_eq!(code, ErrorCode::SubmissionFailed);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::GroupNotFound), "6002");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::CatalogUnavailable.message(), "Cannot load options");
        assert_eq!(
            ErrorCode::SpecificationMissing.message(),
            "Please choose a specification first"
        );
    }
}
