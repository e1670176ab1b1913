//! # Notices
//!
//! Typed user-facing notifications produced by the gate and the workflows.
//! Nothing in this crate renders them; frontends decide how a notice is shown
//! (blocking dialog, toast, stderr line).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity used by frontends that render notices as toasts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastLevel {
    /// Neutral information
    #[default]
    Info,
    /// An action succeeded
    Success,
    /// Something needs attention
    Warning,
    /// An action failed
    Error,
}

impl ToastLevel {
    /// Indicator symbol for plain-text frontends.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Info => "i",
            Self::Success => "+",
            Self::Warning => "!",
            Self::Error => "x",
        }
    }
}

/// A message the user needs to see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// The identity lacks the permission a view requires
    AccessDenied,
    /// Security is not configured, so the view does not apply
    NotConfigured,
    /// A backend call failed
    Error {
        /// Raw response body
        body: String,
    },
}

impl Notice {
    /// Error notice carrying a raw response body.
    pub fn error(body: impl Into<String>) -> Self {
        Self::Error { body: body.into() }
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::AccessDenied => "Access denied",
            Self::NotConfigured => "Not applicable",
            Self::Error { .. } => "Error",
        }
    }

    /// Dialog body.
    pub fn message(&self) -> &str {
        match self {
            Self::AccessDenied => "Please contact your system administrator.",
            Self::NotConfigured => {
                "User administration is not configured for this registry."
            }
            Self::Error { body } => body,
        }
    }

    /// Whether the notice must be acknowledged before continuing.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::AccessDenied)
    }

    /// Toast severity.
    pub fn level(&self) -> ToastLevel {
        match self {
            Self::AccessDenied | Self::Error { .. } => ToastLevel::Error,
            Self::NotConfigured => ToastLevel::Warning,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_notice_shows_raw_body() {
        let notice = Notice::error("Bucket name already exists");
        assert_eq!(notice.message(), "Bucket name already exists");
        assert_eq!(notice.to_string(), "Error: Bucket name already exists");
        assert!(notice.is_blocking());
    }

    #[test]
    fn test_notice_levels() {
        assert_eq!(Notice::AccessDenied.level(), ToastLevel::Error);
        assert_eq!(Notice::NotConfigured.level(), ToastLevel::Warning);
        assert!(!Notice::NotConfigured.is_blocking());
    }
}
