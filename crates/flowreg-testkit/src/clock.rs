//! Controllable clock for deterministic expiration tests

use async_trait::async_trait;
use flowreg_core::effects::{PhysicalTime, PhysicalTimeEffects, TimeError};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock that only moves when a test moves it. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ControllableClock {
    now_ms: Arc<AtomicI64>,
}

impl ControllableClock {
    /// Create a clock reading `now_ms` milliseconds since the epoch
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now_ms)),
        }
    }

    /// Current time in epoch milliseconds.
    pub fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    /// Set absolute time
    pub fn set_ms(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Advance time by `delta_ms` milliseconds
    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Default for ControllableClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl PhysicalTimeEffects for ControllableClock {
    async fn physical_time(&self) -> Result<PhysicalTime, TimeError> {
        Ok(PhysicalTime::from_millis(self.now_ms()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowreg_core::effects::TimeEffects;

    #[tokio::test]
    async fn test_clones_share_time() {
        let clock = ControllableClock::new(1_000);
        let other = clock.clone();

        clock.advance_ms(500);
        assert_eq!(other.current_timestamp_ms().await, 1_500);

        other.set_ms(42_000);
        assert_eq!(clock.current_timestamp().await, 42);
    }
}
