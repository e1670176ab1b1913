//! Layer 3: Production effect handlers
//!
//! Stateless or self-contained implementations of the `flowreg-core` effect
//! traits that delegate to the operating system.
//!
//! **Layer Constraint**: NO mock handlers - those belong in `flowreg-testkit`.

#![forbid(unsafe_code)]

pub mod storage;
pub mod time;

pub use storage::{FilesystemStorageHandler, MemoryStorageHandler};
pub use time::RealTimeHandler;
