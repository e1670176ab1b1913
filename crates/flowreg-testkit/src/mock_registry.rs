//! In-memory registry backend
//!
//! [`MockRegistryApi`] behaves like a small registry: buckets, droplets,
//! users and groups live in memory and mutations are visible to later reads.
//! Every call is logged by operation name, and any operation can be made to
//! fail with a scripted [`ApiError`].

use async_trait::async_trait;
use flowreg_core::effects::{ApiError, RegistryApi};
use flowreg_core::{Bucket, CurrentUser, Droplet, TenantRef, User, UserGroup};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::fixtures;

/// Body the registry returns when ticket exchange is not configured.
pub const KERBEROS_UNSUPPORTED: &str =
    "Kerberos ticket login not supported by this NiFi Registry";

#[derive(Debug)]
struct MockState {
    buckets: Vec<Bucket>,
    droplets: Vec<Droplet>,
    users: Vec<User>,
    groups: Vec<UserGroup>,
    current_user: Result<CurrentUser, ApiError>,
    ticket: Result<String, ApiError>,
    logins: HashMap<(String, String), String>,
    failures: HashMap<String, ApiError>,
    calls: Vec<String>,
    next_id: u64,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
            droplets: Vec::new(),
            users: Vec::new(),
            groups: Vec::new(),
            current_user: Ok(fixtures::anonymous()),
            ticket: Err(ApiError::http(409, KERBEROS_UNSUPPORTED)),
            logins: HashMap::new(),
            failures: HashMap::new(),
            calls: Vec::new(),
            next_id: 1,
        }
    }
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }
}

fn not_found(what: &str, id: &str) -> ApiError {
    ApiError::http(404, format!("The specified {what} ID does not exist in this registry: {id}"))
}

/// Scripted, stateful `RegistryApi`. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MockRegistryApi {
    state: Arc<Mutex<MockState>>,
}

impl MockRegistryApi {
    /// Unsecured registry with no data.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Setup ───────────────────────────────────────────────

    /// Seed buckets.
    pub fn with_buckets(self, buckets: Vec<Bucket>) -> Self {
        self.state.lock().buckets = buckets;
        self
    }

    /// Seed droplets.
    pub fn with_droplets(self, droplets: Vec<Droplet>) -> Self {
        self.state.lock().droplets = droplets;
        self
    }

    /// Seed users.
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.state.lock().users = users;
        self
    }

    /// Seed groups.
    pub fn with_groups(self, groups: Vec<UserGroup>) -> Self {
        self.state.lock().groups = groups;
        self
    }

    /// Identity returned by `load_current_user`.
    pub fn with_current_user(self, user: CurrentUser) -> Self {
        self.set_current_user(user);
        self
    }

    /// Ticket exchange succeeds with `token`.
    pub fn with_ticket(self, token: impl Into<String>) -> Self {
        self.state.lock().ticket = Ok(token.into());
        self
    }

    /// `post_to_login(username, password)` returns `token`.
    pub fn with_login(self, username: &str, password: &str, token: impl Into<String>) -> Self {
        self.state
            .lock()
            .logins
            .insert((username.to_string(), password.to_string()), token.into());
        self
    }

    /// Every call to `operation` fails with `error` until cleared.
    pub fn with_failure(self, operation: &str, error: ApiError) -> Self {
        self.fail(operation, error);
        self
    }

    /// Change the identity mid-test.
    pub fn set_current_user(&self, user: CurrentUser) {
        self.state.lock().current_user = Ok(user);
    }

    /// Make `operation` fail with `error` until cleared.
    pub fn fail(&self, operation: &str, error: ApiError) {
        self.state
            .lock()
            .failures
            .insert(operation.to_string(), error);
    }

    /// Undo [`fail`](Self::fail).
    pub fn clear_failure(&self, operation: &str) {
        self.state.lock().failures.remove(operation);
    }

    // ─── Inspection ──────────────────────────────────────────

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Calls made to `operation` so far.
    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.as_str() == operation)
            .count()
    }

    /// Calls made to any operation.
    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Current bucket state.
    pub fn buckets(&self) -> Vec<Bucket> {
        self.state.lock().buckets.clone()
    }

    /// Current droplet state.
    pub fn droplets(&self) -> Vec<Droplet> {
        self.state.lock().droplets.clone()
    }

    /// Current user state.
    pub fn users(&self) -> Vec<User> {
        self.state.lock().users.clone()
    }

    /// Current group state.
    pub fn groups(&self) -> Vec<UserGroup> {
        self.state.lock().groups.clone()
    }

    /// Log the call, then apply the scripted failure if one is set.
    fn enter(&self, operation: &str) -> Result<parking_lot::MutexGuard<'_, MockState>, ApiError> {
        let mut state = self.state.lock();
        state.calls.push(operation.to_string());
        if let Some(error) = state.failures.get(operation).cloned() {
            return Err(error);
        }
        Ok(state)
    }
}

#[async_trait]
impl RegistryApi for MockRegistryApi {
    async fn get_buckets(&self) -> Result<Vec<Bucket>, ApiError> {
        Ok(self.enter("get_buckets")?.buckets.clone())
    }

    async fn get_bucket(&self, bucket_id: &str, _verbose: bool) -> Result<Bucket, ApiError> {
        let state = self.enter("get_bucket")?;
        state
            .buckets
            .iter()
            .find(|b| b.identifier == bucket_id)
            .cloned()
            .ok_or_else(|| not_found("bucket", bucket_id))
    }

    async fn create_bucket(&self, name: &str) -> Result<Bucket, ApiError> {
        let mut state = self.enter("create_bucket")?;
        if state.buckets.iter().any(|b| b.name.eq_ignore_ascii_case(name)) {
            return Err(ApiError::http(
                409,
                "A bucket with the same name already exists",
            ));
        }
        let id = state.next_id("bucket");
        let bucket = fixtures::bucket(&id, name);
        state.buckets.push(bucket.clone());
        Ok(bucket)
    }

    async fn delete_bucket(&self, bucket_id: &str) -> Result<Bucket, ApiError> {
        let mut state = self.enter("delete_bucket")?;
        let index = state
            .buckets
            .iter()
            .position(|b| b.identifier == bucket_id)
            .ok_or_else(|| not_found("bucket", bucket_id))?;
        state.droplets.retain(|d| d.bucket_identifier != bucket_id);
        Ok(state.buckets.remove(index))
    }

    async fn get_droplets(&self, bucket_id: Option<&str>) -> Result<Vec<Droplet>, ApiError> {
        let state = self.enter("get_droplets")?;
        Ok(state
            .droplets
            .iter()
            .filter(|d| bucket_id.map_or(true, |id| d.bucket_identifier == id))
            .cloned()
            .collect())
    }

    async fn get_droplet(
        &self,
        bucket_id: &str,
        _droplet_type: &str,
        droplet_id: &str,
        _verbose: bool,
    ) -> Result<Droplet, ApiError> {
        let state = self.enter("get_droplet")?;
        state
            .droplets
            .iter()
            .find(|d| d.identifier == droplet_id && d.bucket_identifier == bucket_id)
            .cloned()
            .ok_or_else(|| not_found("droplet", droplet_id))
    }

    async fn delete_droplet(&self, droplet_uri: &str) -> Result<Droplet, ApiError> {
        let mut state = self.enter("delete_droplet")?;
        let uri = droplet_uri.trim_start_matches('/');
        let index = state
            .droplets
            .iter()
            .position(|d| d.uri() == Some(uri))
            .ok_or_else(|| not_found("droplet", uri))?;
        Ok(state.droplets.remove(index))
    }

    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.enter("get_users")?.users.clone())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let state = self.enter("get_user")?;
        state
            .users
            .iter()
            .find(|u| u.identifier == user_id)
            .cloned()
            .ok_or_else(|| not_found("user", user_id))
    }

    async fn add_user(&self, identity: &str) -> Result<User, ApiError> {
        let mut state = self.enter("add_user")?;
        if state.users.iter().any(|u| u.identity == identity) {
            return Err(ApiError::http(
                409,
                format!("Found existing user with the same identity: {identity}"),
            ));
        }
        let id = state.next_id("user");
        let user = fixtures::user(&id, identity);
        state.users.push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<User, ApiError> {
        let mut state = self.enter("delete_user")?;
        let index = state
            .users
            .iter()
            .position(|u| u.identifier == user_id)
            .ok_or_else(|| not_found("user", user_id))?;
        for group in &mut state.groups {
            group.users.retain(|u| u.identifier != user_id);
        }
        Ok(state.users.remove(index))
    }

    async fn get_user_groups(&self) -> Result<Vec<UserGroup>, ApiError> {
        Ok(self.enter("get_user_groups")?.groups.clone())
    }

    async fn get_user_group(&self, group_id: &str) -> Result<UserGroup, ApiError> {
        let state = self.enter("get_user_group")?;
        state
            .groups
            .iter()
            .find(|g| g.identifier == group_id)
            .cloned()
            .ok_or_else(|| not_found("user group", group_id))
    }

    async fn create_user_group(
        &self,
        name: &str,
        members: &[TenantRef],
    ) -> Result<UserGroup, ApiError> {
        let mut state = self.enter("create_user_group")?;
        let id = state.next_id("group");
        let group = UserGroup {
            identifier: id,
            identity: name.to_string(),
            users: members.to_vec(),
            configurable: Some(true),
            ..UserGroup::default()
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    async fn update_user_group(
        &self,
        group_id: &str,
        name: &str,
        members: &[TenantRef],
    ) -> Result<UserGroup, ApiError> {
        let mut state = self.enter("update_user_group")?;
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.identifier == group_id)
            .ok_or_else(|| not_found("user group", group_id))?;
        group.identity = name.to_string();
        group.users = members.to_vec();
        Ok(group.clone())
    }

    async fn delete_user_group(&self, group_id: &str) -> Result<UserGroup, ApiError> {
        let mut state = self.enter("delete_user_group")?;
        let index = state
            .groups
            .iter()
            .position(|g| g.identifier == group_id)
            .ok_or_else(|| not_found("user group", group_id))?;
        Ok(state.groups.remove(index))
    }

    async fn ticket_exchange(&self) -> Result<String, ApiError> {
        self.enter("ticket_exchange")?.ticket.clone()
    }

    async fn load_current_user(&self) -> Result<CurrentUser, ApiError> {
        self.enter("load_current_user")?.current_user.clone()
    }

    async fn post_to_login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let state = self.enter("post_to_login")?;
        state
            .logins
            .get(&(username.to_string(), password.to_string()))
            .cloned()
            .ok_or_else(|| {
                ApiError::http(401, "The supplied username and password are not valid.")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mutations_are_visible() {
        let api = MockRegistryApi::new().with_buckets(vec![fixtures::bucket("b-1", "Prod")]);

        let created = api.create_bucket("Staging").await.unwrap();
        assert_eq!(api.get_buckets().await.unwrap().len(), 2);

        let duplicate = api.create_bucket("prod").await.unwrap_err();
        assert_eq!(duplicate.status(), Some(409));

        api.delete_bucket(&created.identifier).await.unwrap();
        assert_eq!(api.buckets().len(), 1);
        assert_eq!(
            api.calls(),
            ["create_bucket", "get_buckets", "create_bucket", "delete_bucket"]
        );
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let api = MockRegistryApi::new().with_failure("get_users", ApiError::transport("down"));

        assert!(api.get_users().await.is_err());
        api.clear_failure("get_users");
        assert!(api.get_users().await.is_ok());
        assert_eq!(api.call_count("get_users"), 2);
    }

    #[tokio::test]
    async fn test_defaults_to_unsecured_registry() {
        let api = MockRegistryApi::new();
        assert!(api.load_current_user().await.unwrap().anonymous);
        assert_eq!(api.ticket_exchange().await.unwrap_err().status(), Some(409));
        assert!(api
            .post_to_login("alice", "pw")
            .await
            .unwrap_err()
            .is_unauthorized());
    }

    #[tokio::test]
    async fn test_delete_droplet_by_uri() {
        let api = MockRegistryApi::new().with_droplets(vec![fixtures::droplet("d-1", "ingest", "b-1")]);

        let deleted = api.delete_droplet("/buckets/b-1/flows/d-1").await.unwrap();
        assert_eq!(deleted.identifier, "d-1");
        assert!(api.droplets().is_empty());
    }
}
