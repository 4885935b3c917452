//! Unified error handling for the mlmod client and CLI
//!
//! This module provides:
//! - Unique error codes for debugging and documentation
//! - Structured error information with context
//! - Convenient constructor methods
//! - Automatic conversions from common error types

use std::fmt;
use thiserror::Error;

/// Unified Result type for all mlmod operations
pub type Result<T> = std::result::Result<T, MlmodError>;

/// Error codes for mlmod operations
///
/// Each error has a unique code in the format `MXXX` where:
/// - M2XX: Network and API errors
/// - M3XX: File and I/O errors
/// - M4XX: Configuration errors
/// - M5XX: Validation and input errors
/// - M7XX: Module and resource errors
/// - M8XX: UI and interaction errors
/// - M9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network (M2XX)
    /// M201: HTTP request failed
    HttpError,
    /// M202: Connection timeout
    ConnectionTimeout,
    /// M204: Connection refused
    ConnectionRefused,
    /// M205: API returned error response
    ApiError,
    /// M206: Invalid API response format
    InvalidResponse,
    /// M207: Remote operation failed
    OperationFailed,

    // File/IO (M3XX)
    /// M301: File not found
    FileNotFound,
    /// M302: File read error
    FileReadError,
    /// M303: File write error
    FileWriteError,

    // Configuration (M4XX)
    /// M401: Configuration error
    ConfigError,
    /// M402: Invalid endpoint URL
    InvalidEndpoint,

    // Validation (M5XX)
    /// M501: Invalid input
    InvalidInput,
    /// M502: Validation failed
    ValidationFailed,

    // Module/Resource (M7XX)
    /// M701: Module not found
    ModuleNotFound,

    // UI (M8XX)
    /// M801: Dialog error
    DialogError,

    // Internal (M9XX)
    /// M901: Internal error
    InternalError,
    /// M902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 204,
            ErrorCode::ApiError => 205,
            ErrorCode::InvalidResponse => 206,
            ErrorCode::OperationFailed => 207,

            ErrorCode::FileNotFound => 301,
            ErrorCode::FileReadError => 302,
            ErrorCode::FileWriteError => 303,

            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::ModuleNotFound => 701,

            ErrorCode::DialogError => 801,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }

    /// Get the string code (e.g., "M201")
    pub fn as_str(&self) -> String {
        format!("M{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.code())
    }
}

/// Main error type for all mlmod operations
#[derive(Error, Debug)]
pub enum MlmodError {
    // ==================== Network Errors (M2XX) ====================
    /// HTTP/Network error
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// API error with status code
    #[error("[{code}] API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// Operation failure as shown to the user
    #[error("[{code}] {message}")]
    OperationFailed { code: ErrorCode, message: String },

    // ==================== File/IO Errors (M3XX) ====================
    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ==================== Configuration Errors (M4XX) ====================
    /// Configuration error
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    // ==================== Validation Errors (M5XX) ====================
    /// Validation error
    #[error("[{code}] Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    /// Invalid input error
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    // ==================== Module/Resource Errors (M7XX) ====================
    /// Resource not found
    #[error("[{code}] Not found: {resource}")]
    NotFound { code: ErrorCode, resource: String },

    // ==================== UI Errors (M8XX) ====================
    /// UI/Dialog error
    #[error("[{code}] UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    // ==================== Internal Errors (M9XX) ====================
    /// Internal/Unexpected error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// JSON serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

// ==================== Constructor Methods ====================

impl MlmodError {
    // --- Network ---

    /// Create network error from message
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::HttpError,
            message: message.into(),
            source: None,
        }
    }

    /// Create network error from reqwest error
    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else if err.is_decode() {
            ErrorCode::InvalidResponse
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            message: message.into(),
        }
    }

    /// Create invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status: 0,
            message: message.into(),
        }
    }

    /// Create operation failed error from a displayed message
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            code: ErrorCode::OperationFailed,
            message: message.into(),
        }
    }

    // --- File/IO ---

    /// Create IO error from std::io::Error
    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    // --- Configuration ---

    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration error with source
    pub fn config_from_error(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create invalid endpoint error
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::InvalidEndpoint,
            message: message.into(),
            source: None,
        }
    }

    // --- Validation ---

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: None,
        }
    }

    /// Create validation error with field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    // --- Module/Resource ---

    /// Create module not found error
    pub fn module_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ModuleNotFound,
            resource: id.into(),
        }
    }

    // --- Internal ---

    /// Create internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    // --- Utility Methods ---

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::OperationFailed { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// The bare message carried by this error, if it has a non-blank one
    ///
    /// Unlike `Display`, this leaves out the code and category prefix so the
    /// text can be shown to users as-is.
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            Self::Network { message, .. }
            | Self::Api { message, .. }
            | Self::OperationFailed { message, .. }
            | Self::Io { message, .. }
            | Self::Config { message, .. }
            | Self::Validation { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::Ui { message, .. }
            | Self::Internal { message, .. }
            | Self::Serialization { message, .. } => message.as_str(),
            Self::NotFound { resource, .. } => resource.as_str(),
        };

        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Check if this is a network error
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Api { .. })
    }
}

// ==================== From Implementations ====================

impl From<std::io::Error> for MlmodError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for MlmodError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for MlmodError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for MlmodError {
    fn from(err: config::ConfigError) -> Self {
        Self::config_from_error(err)
    }
}

impl From<dialoguer::Error> for MlmodError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}

impl From<validator::ValidationErrors> for MlmodError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::HttpError.code(), 201);
        assert_eq!(ErrorCode::FileNotFound.code(), 301);
        assert_eq!(ErrorCode::ConfigError.code(), 401);
        assert_eq!(ErrorCode::ModuleNotFound.code(), 701);
    }

    #[test]
    fn test_error_code_string() {
        assert_eq!(ErrorCode::ApiError.as_str(), "M205");
        assert_eq!(ErrorCode::DialogError.to_string(), "M801");
    }

    #[test]
    fn test_error_display() {
        let err = MlmodError::api(500, "Database unavailable");
        assert!(err.to_string().contains("M205"));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Database unavailable"));
    }

    #[test]
    fn test_message_strips_prefix() {
        let err = MlmodError::api(404, "Module 9 not found");
        assert_eq!(err.message(), Some("Module 9 not found"));
    }

    #[test]
    fn test_blank_message_is_none() {
        assert_eq!(MlmodError::api(500, "").message(), None);
        assert_eq!(MlmodError::network("   ").message(), None);
    }

    #[test]
    fn test_error_classification() {
        assert!(MlmodError::api(503, "down").is_network_error());
        assert!(!MlmodError::validation("bad").is_network_error());
    }
}
