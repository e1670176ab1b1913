//! # flowreg App - Portable Headless Application Core
//!
//! Decision logic of the registry console with no rendering and no direct
//! I/O. Every backend call goes through the `RegistryApi` effect and every
//! persisted value through `StorageEffects`, so the same core drives the
//! terminal frontend and deterministic tests.
//!
//! ## Modules
//!
//! - [`store`]: expiring key/value entries and the session token
//! - [`session`]: the single session behind a shared handle
//! - [`gate`]: navigation guards that resolve the identity when needed
//! - [`routes`]: console URLs and side-panel outlets
//! - [`views`]: table filter/sort/selection and user-facing notices
//! - [`workflows`]: login, explorer, bucket and tenant administration
//! - [`errors`]: error categories for frontends

#![forbid(unsafe_code)]

mod console;

pub mod errors;
pub mod gate;
pub mod routes;
pub mod session;
pub mod store;
pub mod views;
pub mod workflows;

pub use console::ConsoleCore;
pub use errors::{error_notice, ErrorCategory};
pub use gate::{Activation, GateDecision, GateVariant, NavigationAttempt, SessionGate};
pub use routes::{Location, Route, Sidenav};
pub use session::{Identity, Session, SessionContext};
pub use store::{decode_session_token, LocalExpiringStore, DEFAULT_TTL_MS, JWT_KEY};
pub use views::{ColumnDescriptor, Notice, SortOrder, TableState, Tabular, Tenant, ToastLevel};
