//! Layer 3: Time Effect Handlers - Production Only
//!
//! Stateless implementation of `PhysicalTimeEffects` delegating to system time.
//!
//! **Layer Constraint**: NO mock handlers - the controllable clock lives in
//! `flowreg-testkit`.

use async_trait::async_trait;
use flowreg_core::effects::{PhysicalTime, PhysicalTimeEffects, TimeError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Real time handler for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhysicalTimeEffects for RealTimeHandler {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::OperationFailed {
                reason: e.to_string(),
            })?;
        let ts_ms = i64::try_from(elapsed.as_millis()).map_err(|e| TimeError::OperationFailed {
            reason: e.to_string(),
        })?;
        Ok(PhysicalTime::from_millis(ts_ms))
    }
}
