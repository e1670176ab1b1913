//! Registry domain types

pub mod permissions;
pub mod records;

pub use permissions::{resources, BucketsPermissionCheck, PermissionSet, Permissions};
pub use records::{Bucket, CurrentUser, Droplet, Link, Revision, TenantRef, User, UserGroup};
