//! Request paths and bodies for the registry REST API.
//!
//! Paths are relative to the API root (`/nifi-registry-api`) and always start
//! with `/`.

use flowreg_core::TenantRef;
use serde::Serialize;

/// Bucket collection
pub const BUCKETS: &str = "/buckets";
/// Droplets across buckets
pub const ITEMS: &str = "/items";
/// User collection
pub const USERS: &str = "/tenants/users";
/// Group collection
pub const USER_GROUPS: &str = "/tenants/user-groups";
/// Identity behind the session
pub const ACCESS: &str = "/access";
/// Ticket exchange
pub const KERBEROS_TOKEN: &str = "/access/token/kerberos";
/// Username/password exchange
pub const LOGIN_TOKEN: &str = "/access/token/login";

fn with_verbose(path: String, verbose: bool) -> String {
    if verbose {
        format!("{path}?verbose=true")
    } else {
        path
    }
}

/// `/buckets/{id}`, optionally verbose.
pub fn bucket(bucket_id: &str, verbose: bool) -> String {
    with_verbose(format!("{BUCKETS}/{bucket_id}"), verbose)
}

/// `/items` or `/items/{bucketId}`.
pub fn items(bucket_id: Option<&str>) -> String {
    match bucket_id {
        Some(id) => format!("{ITEMS}/{id}"),
        None => ITEMS.to_string(),
    }
}

/// `/buckets/{bucketId}/{type}/{id}`, optionally verbose.
pub fn droplet(bucket_id: &str, droplet_type: &str, droplet_id: &str, verbose: bool) -> String {
    with_verbose(
        format!("{BUCKETS}/{bucket_id}/{droplet_type}/{droplet_id}"),
        verbose,
    )
}

/// Droplet URIs come from `link.href` and are relative to the API root.
pub fn droplet_uri(uri: &str) -> String {
    format!("/{}", uri.trim_start_matches('/'))
}

/// `/tenants/users/{id}`.
pub fn user(user_id: &str) -> String {
    format!("{USERS}/{user_id}")
}

/// `/tenants/user-groups/{id}`.
pub fn user_group(group_id: &str) -> String {
    format!("{USER_GROUPS}/{group_id}")
}

/// `POST /buckets` body.
#[derive(Debug, Serialize)]
pub struct CreateBucketBody<'a> {
    /// Bucket name
    pub name: &'a str,
}

/// `POST /tenants/users` body.
#[derive(Debug, Serialize)]
pub struct AddUserBody<'a> {
    /// Login identity of the new user
    pub identity: &'a str,
}

/// User group create and update body.
#[derive(Debug, Serialize)]
pub struct UserGroupBody<'a> {
    /// Only sent on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<&'a str>,
    /// Group name
    pub identity: &'a str,
    /// Full member list
    pub users: &'a [TenantRef],
}
