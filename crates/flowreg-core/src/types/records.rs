//! Registry records as they appear on the wire (camelCase JSON).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::permissions::{PermissionSet, Permissions};

/// Hypermedia link attached to registry entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Relative URI of the entity
    pub href: String,
    /// Query parameters, if any
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// Optimistic-locking revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Incremented by every accepted update
    pub version: u64,
}

/// A named container of droplets with its own access-control scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Backend-assigned identifier
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
    /// Whether anonymous users may read the bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_public_read: Option<bool>,
    /// The current identity's permissions on this bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    /// Revision for optimistic locking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
    /// Hypermedia link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

/// A versioned, bucket-scoped artifact (flow, extension bundle, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Droplet {
    /// Backend-assigned identifier
    pub identifier: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning bucket
    pub bucket_identifier: String,
    /// Owning bucket name, when the backend includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_timestamp: Option<i64>,
    /// Wire `type`, e.g. `Flow`
    #[serde(rename = "type")]
    pub droplet_type: String,
    /// Number of stored versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_count: Option<u64>,
    /// The current identity's permissions on this droplet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    /// Carries the URI used for deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    /// Version history, only populated by verbose requests.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snapshot_metadata: Vec<serde_json::Value>,
}

impl Droplet {
    /// Relative URI used to address this droplet for deletion.
    pub fn uri(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.href.as_str())
    }
}

/// Lightweight reference to a user or group from the other side of a membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRef {
    /// Identifier of the referenced tenant
    pub identifier: String,
    /// Display identity
    pub identity: String,
    /// Whether the backend allows editing the tenant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable: Option<bool>,
}

impl TenantRef {
    /// Reference without the `configurable` flag.
    pub fn new(identifier: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            identity: identity.into(),
            configurable: None,
        }
    }
}

/// A registry user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend-assigned identifier
    pub identifier: String,
    /// Login identity
    pub identity: String,
    /// Groups the user belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_groups: Vec<TenantRef>,
    /// Whether the backend allows editing this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable: Option<bool>,
    /// Permissions granted directly to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_permissions: Option<PermissionSet>,
    /// Revision for optimistic locking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
}

impl User {
    /// Membership reference to this user.
    pub fn as_tenant_ref(&self) -> TenantRef {
        TenantRef {
            identifier: self.identifier.clone(),
            identity: self.identity.clone(),
            configurable: self.configurable,
        }
    }
}

/// A registry user group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    /// Backend-assigned identifier
    pub identifier: String,
    /// Group name
    pub identity: String,
    /// Members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<TenantRef>,
    /// Whether the backend allows editing this group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable: Option<bool>,
    /// Permissions granted to every member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_permissions: Option<PermissionSet>,
    /// Revision for optimistic locking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Revision>,
}

impl UserGroup {
    /// Whether `user_id` is a member.
    pub fn has_member(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.identifier == user_id)
    }
}

/// Response of `GET /access`: the identity behind the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Identity string, `anonymous` for the anonymous principal
    pub identity: String,
    /// True when no credentials were presented
    #[serde(default)]
    pub anonymous: bool,
    /// Permissions of the identity
    #[serde(default)]
    pub resource_permissions: PermissionSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::resources;

    #[test]
    fn test_droplet_from_items_response() {
        let json = r#"{
            "identifier": "d-1",
            "name": "ingest",
            "bucketIdentifier": "b-1",
            "bucketName": "Prod",
            "createdTimestamp": 1540000000000,
            "modifiedTimestamp": 1540000001000,
            "type": "Flow",
            "versionCount": 3,
            "link": {"params": {"rel": "self"}, "href": "buckets/b-1/flows/d-1"}
        }"#;
        let droplet: Droplet = serde_json::from_str(json).unwrap();

        assert_eq!(droplet.droplet_type, "Flow");
        assert_eq!(droplet.version_count, Some(3));
        assert_eq!(droplet.uri(), Some("buckets/b-1/flows/d-1"));
        assert!(droplet.snapshot_metadata.is_empty());
    }

    #[test]
    fn test_current_user_from_access_response() {
        let json = r#"{
            "identity": "alice",
            "anonymous": false,
            "resourcePermissions": {
                "anyTopLevelResource": {"canRead": true},
                "tenants": {"canRead": false}
            }
        }"#;
        let user: CurrentUser = serde_json::from_str(json).unwrap();

        assert_eq!(user.identity, "alice");
        assert!(!user.anonymous);
        assert!(user
            .resource_permissions
            .can_read(resources::ANY_TOP_LEVEL_RESOURCE));
        assert!(!user.resource_permissions.can_read(resources::TENANTS));
    }

    #[test]
    fn test_group_membership() {
        let group = UserGroup {
            identifier: "g-1".into(),
            identity: "admins".into(),
            users: vec![TenantRef::new("u-1", "alice")],
            ..UserGroup::default()
        };
        assert!(group.has_member("u-1"));
        assert!(!group.has_member("u-2"));
    }
}
