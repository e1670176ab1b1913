//! # View State Module
//!
//! Per-view state for list screens and the typed notices shown to the user.
//! Nothing here performs I/O; workflows fill these types from the registry.

pub mod notifications;
pub mod table;
pub mod tenants;

pub use notifications::{Notice, ToastLevel};
pub use table::{
    activate_default_column, active_column, filter, sort, toggle_column, ColumnDescriptor,
    SortOrder, TableState, Tabular,
};
pub use tenants::Tenant;
