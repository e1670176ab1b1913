//! flowreg Core - Registry Console Foundation
//!
//! This crate provides the foundational domain types and effect interfaces
//! shared by every layer of the registry console. It contains no I/O and no
//! application logic.
//!
//! # Architecture Layers
//!
//! ## Domain Types
//! - Registry records: `Bucket`, `Droplet`, `User`, `UserGroup`
//! - Authorization data: `PermissionSet`, `Permissions`, `CurrentUser`
//!
//! ## Effect Interfaces (Pure Signatures)
//! - `StorageEffects`: key/value persistence (browser storage equivalent)
//! - `PhysicalTimeEffects`: wall-clock time for expirations
//! - `RegistryApi`: the REST facade consumed by the application core
//! - `BearerTokenProvider`: session token lookup for authenticated requests
//!
//! Handlers live in `flowreg-effects` and `flowreg-client`; deterministic
//! test handlers live in `flowreg-testkit`.

#![forbid(unsafe_code)]

// === Core Modules ===

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Console configuration loading and validation
pub mod config;

/// Registry domain types
pub mod types;

// === Public API Re-exports ===

pub use config::{ConfigError, ConsoleConfig, DEFAULT_API_PATH};
pub use effects::{
    ApiError, BearerTokenProvider, PhysicalTime, PhysicalTimeEffects, RegistryApi, StorageEffects,
    StorageError, TimeEffects, TimeError,
};
pub use errors::{ConsoleError, Result};
pub use types::{
    resources, Bucket, BucketsPermissionCheck, CurrentUser, Droplet, Link, PermissionSet,
    Permissions, TenantRef, User, UserGroup,
};
