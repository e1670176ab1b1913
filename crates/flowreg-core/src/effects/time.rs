//! Time effect interface.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `flowreg-effects` (Layer 3), controllable variant in `flowreg-testkit`
//! - **Usage**: expiration checks in the local expiring store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error type for time operations.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// No clock is available
    #[error("Time service unavailable")]
    ServiceUnavailable,
    /// The clock returned an error
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Failure description
        reason: String,
    },
}

/// A wall-clock reading in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: i64,
}

impl PhysicalTime {
    /// Wrap a millisecond timestamp.
    pub fn from_millis(ts_ms: i64) -> Self {
        Self { ts_ms }
    }
}

/// Wall-clock time source.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current wall-clock time.
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError>;
}

/// Convenience accessors over `PhysicalTimeEffects`.
///
/// Blanket implemented for any physical clock provider. A failing clock reads
/// as the epoch, which makes every stored expiry look like the future.
#[async_trait]
pub trait TimeEffects: PhysicalTimeEffects {
    /// Current Unix timestamp in milliseconds.
    async fn current_timestamp_ms(&self) -> i64 {
        self.physical_time().await.map(|t| t.ts_ms).unwrap_or(0)
    }

    /// Current Unix timestamp in seconds.
    async fn current_timestamp(&self) -> i64 {
        self.current_timestamp_ms().await / 1000
    }
}

#[async_trait]
impl<T> TimeEffects for T where T: PhysicalTimeEffects + ?Sized {}

#[async_trait]
impl<T> PhysicalTimeEffects for Arc<T>
where
    T: PhysicalTimeEffects + ?Sized,
{
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        (**self).physical_time().await
    }
}
