//! Layer 1: Core Effect Trait Definitions
//!
//! Pure trait definitions for all side-effect operations in the console.
//! This module defines **what** effects can be performed; handlers define **how**.
//!
//! ## Infrastructure Effects (Layer 3: `flowreg-effects`)
//! - **Storage**: the browser-storage equivalent backing the expiring store
//! - **Time**: wall-clock milliseconds for entry expiration
//!
//! ## Remote Effects (Layer 3: `flowreg-client`)
//! - **Registry**: the REST facade over the registry backend
//!
//! ## Testing Effects (Layer 8: `flowreg-testkit`)
//! - Controllable clock and scripted registry API
//!
//! All effect-using code is parameterized by these traits so the application
//! core stays deterministic under test.

pub mod registry;
pub mod storage;
pub mod time;

pub use registry::{ApiError, BearerTokenProvider, RegistryApi};
pub use storage::{StorageEffects, StorageError};
pub use time::{PhysicalTime, PhysicalTimeEffects, TimeEffects, TimeError};
