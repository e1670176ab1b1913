//! Permission data returned by the backend.
//!
//! The console never computes permissions; it only branches on the flags the
//! backend reports for the current identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource names used as `PermissionSet` keys.
pub mod resources {
    /// Read access to at least one administrative resource
    pub const ANY_TOP_LEVEL_RESOURCE: &str = "anyTopLevelResource";
    /// Bucket administration
    pub const BUCKETS: &str = "buckets";
    /// User and group administration
    pub const TENANTS: &str = "tenants";
    /// Access policy administration
    pub const POLICIES: &str = "policies";
    /// Proxied user requests
    pub const PROXY: &str = "proxy";
}

/// Capability flags for one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    /// May view the resource
    #[serde(default)]
    pub can_read: bool,
    /// May modify the resource
    #[serde(default)]
    pub can_write: bool,
    /// May delete the resource
    #[serde(default)]
    pub can_delete: bool,
}

impl Permissions {
    /// Read-only access.
    pub fn read_only() -> Self {
        Self {
            can_read: true,
            ..Self::default()
        }
    }

    /// Read, write and delete.
    pub fn full() -> Self {
        Self {
            can_read: true,
            can_write: true,
            can_delete: true,
        }
    }
}

/// Mapping from resource name to capability flags.
///
/// A resource may be absent, which is distinct from present-with-all-false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, Permissions>);

impl PermissionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, resource: impl Into<String>, permissions: Permissions) -> Self {
        self.insert(resource, permissions);
        self
    }

    /// Set the flags for `resource`.
    pub fn insert(&mut self, resource: impl Into<String>, permissions: Permissions) {
        self.0.insert(resource.into(), permissions);
    }

    /// Flags for `resource`, if reported.
    pub fn get(&self, resource: &str) -> Option<&Permissions> {
        self.0.get(resource)
    }

    /// Whether the backend reported any entry for `resource`.
    pub fn contains(&self, resource: &str) -> bool {
        self.0.contains_key(resource)
    }

    /// `can_read` for `resource`; absent resources read as `false`.
    pub fn can_read(&self, resource: &str) -> bool {
        self.get(resource).is_some_and(|p| p.can_read)
    }

    /// `can_write` for `resource`; absent resources read as `false`.
    pub fn can_write(&self, resource: &str) -> bool {
        self.get(resource).is_some_and(|p| p.can_write)
    }

    /// Entries in resource-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Permissions)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// No resource was reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How the workflow-administration gate evaluates `buckets` after resolving
/// the current user.
///
/// The synchronous pre-check always reads `buckets.canRead`. After
/// resolution a present-but-false entry passes `Present` and fails `CanRead`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketsPermissionCheck {
    /// Any `buckets` entry grants access
    #[default]
    Present,
    /// Only `buckets.canRead == true` grants access
    CanRead,
}

impl BucketsPermissionCheck {
    /// Whether `permissions` pass this check.
    pub fn evaluate(&self, permissions: &PermissionSet) -> bool {
        match self {
            Self::Present => permissions.contains(resources::BUCKETS),
            Self::CanRead => permissions.can_read(resources::BUCKETS),
        }
    }
}

impl std::str::FromStr for BucketsPermissionCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "can-read" => Ok(Self::CanRead),
            other => Err(format!("unknown buckets permission check: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_set_from_backend_json() {
        let json = r#"{
            "anyTopLevelResource": {"canRead": true, "canWrite": false, "canDelete": false},
            "buckets": {"canRead": false, "canWrite": false, "canDelete": false},
            "tenants": {"canRead": true, "canWrite": true}
        }"#;
        let set: PermissionSet = serde_json::from_str(json).unwrap();

        assert!(set.can_read(resources::ANY_TOP_LEVEL_RESOURCE));
        assert!(!set.can_read(resources::BUCKETS));
        assert!(set.contains(resources::BUCKETS));
        assert!(set.can_write(resources::TENANTS));
        assert!(!set.get(resources::TENANTS).unwrap().can_delete);
        assert!(!set.contains(resources::POLICIES));
        assert!(!set.can_read(resources::POLICIES));
    }

    #[test]
    fn test_buckets_check_present_vs_can_read() {
        let present_but_false =
            PermissionSet::new().with(resources::BUCKETS, Permissions::default());

        assert!(BucketsPermissionCheck::Present.evaluate(&present_but_false));
        assert!(!BucketsPermissionCheck::CanRead.evaluate(&present_but_false));

        let absent = PermissionSet::new();
        assert!(!BucketsPermissionCheck::Present.evaluate(&absent));
        assert!(!BucketsPermissionCheck::CanRead.evaluate(&absent));
    }

    #[test]
    fn test_buckets_check_from_str() {
        assert_eq!(
            "can-read".parse::<BucketsPermissionCheck>(),
            Ok(BucketsPermissionCheck::CanRead)
        );
        assert!("truthy".parse::<BucketsPermissionCheck>().is_err());
    }
}
