//! flowreg Testing Infrastructure
//!
//! Deterministic handlers and record fixtures shared by the console's test
//! suites: a clock that only moves when told to, an in-memory registry
//! backend with scripted failures, and builders for registry records.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! flowreg-testkit = { path = "../flowreg-testkit" }
//! ```
//!
//! ```rust,no_run
//! use flowreg_testkit::*;
//!
//! let effects = TestEffects::at(1_000);
//! let api = effects.api.clone().with_buckets(vec![fixtures::bucket("b-1", "Prod")]);
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod clock;
pub mod fixtures;
pub mod mock_registry;

pub use clock::ControllableClock;
pub use mock_registry::{MockRegistryApi, KERBEROS_UNSUPPORTED};

use flowreg_core::effects::{PhysicalTimeEffects, RegistryApi, StorageEffects};
use flowreg_effects::MemoryStorageHandler;
use std::sync::Arc;

/// Handlers for one test: memory storage, a controllable clock and a mock
/// registry. Clones of each field share state with the originals.
#[derive(Clone, Debug, Default)]
pub struct TestEffects {
    /// In-memory storage
    pub storage: MemoryStorageHandler,
    /// Clock under test control
    pub clock: ControllableClock,
    /// In-memory registry
    pub api: MockRegistryApi,
}

impl TestEffects {
    /// Fresh handlers with the clock at `now_ms`.
    pub fn at(now_ms: i64) -> Self {
        Self {
            clock: ControllableClock::new(now_ms),
            ..Self::default()
        }
    }

    /// Replace the registry backend, keeping storage and clock.
    pub fn with_api(mut self, api: MockRegistryApi) -> Self {
        self.api = api;
        self
    }

    /// Storage as a trait object.
    pub fn storage_handle(&self) -> Arc<dyn StorageEffects> {
        Arc::new(self.storage.clone())
    }

    /// Clock as a trait object.
    pub fn time_handle(&self) -> Arc<dyn PhysicalTimeEffects> {
        Arc::new(self.clock.clone())
    }

    /// Registry as a trait object.
    pub fn api_handle(&self) -> Arc<dyn RegistryApi> {
        Arc::new(self.api.clone())
    }
}
