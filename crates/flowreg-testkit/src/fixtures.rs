//! Registry record fixtures

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flowreg_core::{
    resources, Bucket, CurrentUser, Droplet, Link, PermissionSet, Permissions, TenantRef, User,
    UserGroup,
};

/// Bucket with full permissions and a self link.
pub fn bucket(id: &str, name: &str) -> Bucket {
    Bucket {
        identifier: id.to_string(),
        name: name.to_string(),
        created_timestamp: Some(1_540_000_000_000),
        permissions: Some(Permissions::full()),
        link: Some(Link {
            href: format!("buckets/{id}"),
            ..Link::default()
        }),
        ..Bucket::default()
    }
}

/// A flow droplet whose self link is `buckets/{bucket_id}/flows/{id}`.
pub fn droplet(id: &str, name: &str, bucket_id: &str) -> Droplet {
    Droplet {
        identifier: id.to_string(),
        name: name.to_string(),
        bucket_identifier: bucket_id.to_string(),
        droplet_type: "Flow".to_string(),
        version_count: Some(1),
        link: Some(Link {
            href: format!("buckets/{bucket_id}/flows/{id}"),
            ..Link::default()
        }),
        ..Droplet::default()
    }
}

/// Configurable user with no groups.
pub fn user(id: &str, identity: &str) -> User {
    User {
        identifier: id.to_string(),
        identity: identity.to_string(),
        configurable: Some(true),
        ..User::default()
    }
}

/// Group whose members are `members`.
pub fn group(id: &str, identity: &str, members: &[&User]) -> UserGroup {
    UserGroup {
        identifier: id.to_string(),
        identity: identity.to_string(),
        users: members.iter().map(|u| TenantRef::new(&u.identifier, &u.identity)).collect(),
        configurable: Some(true),
        ..UserGroup::default()
    }
}

/// Permission set from `(resource, permissions)` pairs.
pub fn permissions(entries: &[(&str, Permissions)]) -> PermissionSet {
    entries
        .iter()
        .fold(PermissionSet::new(), |set, (resource, p)| set.with(*resource, *p))
}

/// Full access to every top-level resource.
pub fn admin_permissions() -> PermissionSet {
    permissions(&[
        (resources::ANY_TOP_LEVEL_RESOURCE, Permissions::full()),
        (resources::BUCKETS, Permissions::full()),
        (resources::TENANTS, Permissions::full()),
        (resources::POLICIES, Permissions::full()),
        (resources::PROXY, Permissions::full()),
    ])
}

/// Non-anonymous identity with `permissions`.
pub fn current_user(identity: &str, permissions: PermissionSet) -> CurrentUser {
    CurrentUser {
        identity: identity.to_string(),
        anonymous: false,
        resource_permissions: permissions,
    }
}

/// What an unsecured registry reports: buckets are open, tenant and policy
/// management do not exist.
pub fn anonymous() -> CurrentUser {
    CurrentUser {
        identity: "anonymous".to_string(),
        anonymous: true,
        resource_permissions: permissions(&[
            (resources::ANY_TOP_LEVEL_RESOURCE, Permissions::full()),
            (resources::BUCKETS, Permissions::full()),
            (resources::PROXY, Permissions::full()),
        ]),
    }
}

/// JWT-shaped token for `identity` expiring at `exp_secs`.
pub fn session_token(identity: &str, exp_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
    let payload = serde_json::json!({ "sub": identity, "exp": exp_secs }).to_string();
    format!("{header}.{}.signature", URL_SAFE_NO_PAD.encode(payload))
}
