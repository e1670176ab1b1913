//! Categorized application errors
//!
//! Workflows return [`ConsoleError`]. This module classifies those errors
//! for frontends:
//! - toast severity routing
//! - recovery hints
//! - the notice shown for a failed backend call

use flowreg_core::ConsoleError;
use std::fmt;

pub use crate::views::notifications::ToastLevel;
use crate::views::Notice;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors (correctable by modifying settings)
    Config,
    /// The session token is missing or was rejected
    Authentication,
    /// The identity lacks the required permission
    Permission,
    /// Resource not found errors
    NotFound,
    /// Network connectivity errors and backend rejections
    Network,
    /// General operation failures (catch-all)
    Operation,
}

impl ErrorCategory {
    /// Classify a console error.
    pub fn of(error: &ConsoleError) -> Self {
        match error {
            ConsoleError::Invalid { .. } => Self::Input,
            ConsoleError::Unauthenticated { .. } => Self::Authentication,
            ConsoleError::PermissionDenied { .. } => Self::Permission,
            ConsoleError::NotFound { .. } => Self::NotFound,
            ConsoleError::Network { .. } => Self::Network,
            ConsoleError::Storage { .. } => Self::Config,
            ConsoleError::Serialization { .. } | ConsoleError::Internal { .. } => Self::Operation,
        }
    }

    /// Whether the user can fix this by changing input or settings.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input | Self::Config | Self::Authentication)
    }

    /// Whether retrying may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get the appropriate toast severity for this category.
    #[must_use]
    pub fn toast_severity(&self) -> ToastLevel {
        match self {
            Self::Input => ToastLevel::Info,
            Self::Config | Self::NotFound | Self::Network => ToastLevel::Warning,
            Self::Authentication | Self::Permission | Self::Operation => ToastLevel::Error,
        }
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::Authentication => "Authentication",
            Self::Permission => "Permission",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Operation => "Operation",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Input => "Check your input and try again",
            Self::Config => "Review your configuration settings",
            Self::Authentication => "Log in again",
            Self::Permission => "Please contact your system administrator",
            Self::NotFound => "The requested resource could not be found",
            Self::Network => "Check that the registry is reachable and retry",
            Self::Operation => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The generic error notice for a failed operation: the raw message or body.
pub fn error_notice(error: &ConsoleError) -> Notice {
    Notice::error(error.message())
}
