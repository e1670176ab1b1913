//! Unified error system for flowreg core
//!
//! A single error type shared by the application core and frontends. Layer
//! specific errors (`ApiError`, `StorageError`, `ConfigError`) convert into it.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::effects::{ApiError, StorageError};

/// Unified error type for console operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ConsoleError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Permission denied
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Error message describing the permission issue
        message: String,
    },

    /// The backend rejected the session token (HTTP 401)
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Raw response body
        message: String,
    },

    /// Network, transport or HTTP error
    #[error("Network error: {message}")]
    Network {
        /// Raw response body or transport message
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl ConsoleError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create an unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The message without the category prefix (the raw body for API errors).
    pub fn message(&self) -> &str {
        match self {
            Self::Invalid { message }
            | Self::NotFound { message }
            | Self::PermissionDenied { message }
            | Self::Unauthenticated { message }
            | Self::Network { message }
            | Self::Serialization { message }
            | Self::Storage { message }
            | Self::Internal { message } => message,
        }
    }
}

/// Standard Result type for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status: 401, body } => Self::unauthenticated(body),
            ApiError::Http { status: 403, body } => Self::permission_denied(body),
            ApiError::Http { status: 404, body } => Self::not_found(body),
            ApiError::Http { body, .. } => Self::network(body),
            ApiError::Transport { message } => Self::network(message),
            ApiError::Decode { message } => Self::serialization(message),
        }
    }
}

impl From<StorageError> for ConsoleError {
    fn from(err: StorageError) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<ConfigError> for ConsoleError {
    fn from(err: ConfigError) -> Self {
        Self::invalid(err.to_string())
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ConsoleError::invalid("test message");
        assert!(matches!(err, ConsoleError::Invalid { .. }));
        assert_eq!(err.to_string(), "Invalid: test message");
        assert_eq!(err.message(), "test message");
    }

    #[test]
    fn test_api_error_conversion() {
        let err = ConsoleError::from(ApiError::http(401, "token expired"));
        assert_eq!(err, ConsoleError::unauthenticated("token expired"));

        let err = ConsoleError::from(ApiError::http(409, "bucket exists"));
        assert_eq!(err, ConsoleError::network("bucket exists"));

        let err = ConsoleError::from(ApiError::decode("bad json"));
        assert!(matches!(err, ConsoleError::Serialization { .. }));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConsoleError::from(io_err);
        assert!(matches!(err, ConsoleError::NotFound { .. }));
    }
}
