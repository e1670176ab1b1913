//! # Workflows
//!
//! Multi-step console operations shared by every frontend. Workflows take a
//! [`ConsoleCore`](crate::ConsoleCore), talk to the registry through it and
//! return domain types or [`ConsoleError`].
//!
//! Failures are returned, never shown. Frontends turn them into the generic
//! error notice with [`error_notice`](crate::errors::error_notice), which
//! carries the raw response body.

use flowreg_core::ConsoleError;

pub mod auth;
pub mod buckets;
pub mod explorer;
pub mod users;

/// Result of deleting several records with one request each.
#[derive(Debug)]
pub struct DeleteOutcome<T> {
    /// Records the backend confirmed deleted
    pub deleted: Vec<T>,
    /// Identifier and error of each failed deletion
    pub failed: Vec<(String, ConsoleError)>,
}

impl<T> Default for DeleteOutcome<T> {
    fn default() -> Self {
        Self {
            deleted: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> DeleteOutcome<T> {
    /// No deletion failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub(crate) fn was_deleted<'a>(&'a self, id: &str, key: impl Fn(&'a T) -> &'a str) -> bool {
        self.deleted.iter().any(|d| key(d) == id)
    }
}
