//! # Session State
//!
//! The identity behind the console and the permissions the backend reported
//! for it. There is one [`Session`] per console instance, reached through a
//! cloneable [`SessionContext`] handle that is passed explicitly to the gate,
//! the workflows and the frontends.
//!
//! ## Navigation generations
//!
//! Every navigation that needs identity resolution takes a new generation
//! number. A resolution only writes its result if its generation is still the
//! latest, so a slow response for an abandoned navigation cannot overwrite
//! the session or trigger a stale redirect.

use flowreg_core::{resources, CurrentUser, PermissionSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The resolved principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity string reported by the backend
    pub id: String,
    /// Name shown in the console
    pub display_name: String,
    /// True for the anonymous principal
    pub is_anonymous: bool,
}

impl Identity {
    /// Identity from a `GET /access` response.
    pub fn from_current_user(user: &CurrentUser) -> Self {
        Self {
            id: user.identity.clone(),
            display_name: user.identity.clone(),
            is_anonymous: user.anonymous,
        }
    }
}

/// Session snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// `None` until the gate resolves the identity
    pub identity: Option<Identity>,
    /// Whether the frontend offers a logout action
    pub can_logout: bool,
    /// Where the last gated navigation was headed
    pub redirect_url: Option<String>,
    /// Permissions reported with the identity
    pub permissions: PermissionSet,
    /// Set once a non-anonymous identity with top-level read passed the gate
    pub resources_cleared: bool,
    /// Bumped by every navigation that needs resolution
    pub navigation_generation: u64,
}

impl Session {
    /// Identity resolved and anonymous.
    pub fn is_known_anonymous(&self) -> bool {
        self.identity.as_ref().is_some_and(|i| i.is_anonymous)
    }

    /// Identity resolved and not anonymous.
    pub fn is_authenticated(&self) -> bool {
        self.identity.as_ref().is_some_and(|i| !i.is_anonymous)
    }

    /// Name of the resolved identity.
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.display_name.as_str())
    }

    /// `can_read` of the reported permissions.
    pub fn can_read(&self, resource: &str) -> bool {
        self.permissions.can_read(resource)
    }

    /// Read access to at least one administrative resource.
    pub fn has_top_level_read(&self) -> bool {
        self.can_read(resources::ANY_TOP_LEVEL_RESOURCE)
    }
}

/// Shared handle to the console's single session.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Session>>,
}

impl SessionContext {
    /// Unresolved session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    /// Read the session without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.inner.read())
    }

    /// Mutate the session under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Latest navigation generation.
    pub fn generation(&self) -> u64 {
        self.inner.read().navigation_generation
    }

    /// Start a navigation that needs resolution; returns its generation.
    pub fn begin_navigation(&self, redirect_url: Option<&str>) -> u64 {
        let mut session = self.inner.write();
        session.navigation_generation += 1;
        if let Some(url) = redirect_url {
            session.redirect_url = Some(url.to_string());
        }
        session.navigation_generation
    }

    /// Whether no newer navigation has started since `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Run `f` only if `generation` is still the latest navigation.
    ///
    /// The check and the write happen under one lock.
    pub fn update_if_current<R>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        let mut session = self.inner.write();
        if session.navigation_generation != generation {
            return None;
        }
        Some(f(&mut session))
    }

    /// Replace identity and permissions with what the backend reported.
    pub fn set_current_user(&self, user: &CurrentUser) {
        let mut session = self.inner.write();
        apply_current_user(&mut session, user);
    }

    /// Back to the unresolved state.
    ///
    /// The generation keeps counting so in-flight resolutions are dropped.
    pub fn clear(&self) {
        let mut session = self.inner.write();
        let generation = session.navigation_generation + 1;
        *session = Session {
            navigation_generation: generation,
            ..Session::default()
        };
    }
}

pub(crate) fn apply_current_user(session: &mut Session, user: &CurrentUser) {
    session.identity = Some(Identity::from_current_user(user));
    session.permissions = user.resource_permissions.clone();
    if user.anonymous {
        session.can_logout = false;
        session.resources_cleared = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowreg_core::Permissions;

    fn alice() -> CurrentUser {
        CurrentUser {
            identity: "alice".into(),
            anonymous: false,
            resource_permissions: PermissionSet::new()
                .with(resources::ANY_TOP_LEVEL_RESOURCE, Permissions::read_only()),
        }
    }

    #[test]
    fn test_new_session_is_unresolved() {
        let session = SessionContext::new().snapshot();
        assert!(session.identity.is_none());
        assert!(!session.is_known_anonymous());
        assert!(!session.is_authenticated());
        assert!(session.permissions.is_empty());
    }

    #[test]
    fn test_set_current_user() {
        let ctx = SessionContext::new();
        ctx.set_current_user(&alice());

        let session = ctx.snapshot();
        assert!(session.is_authenticated());
        assert_eq!(session.display_name(), Some("alice"));
        assert!(session.has_top_level_read());
    }

    #[test]
    fn test_stale_generation_does_not_write() {
        let ctx = SessionContext::new();
        let first = ctx.begin_navigation(Some("/administration/users"));
        let second = ctx.begin_navigation(Some("/explorer/grid-list"));

        assert!(ctx
            .update_if_current(first, |s| apply_current_user(s, &alice()))
            .is_none());
        assert!(ctx.snapshot().identity.is_none());
        assert_eq!(
            ctx.snapshot().redirect_url.as_deref(),
            Some("/explorer/grid-list")
        );

        assert!(ctx.update_if_current(second, |_| ()).is_some());
    }

    #[test]
    fn test_clear_resets_and_supersedes() {
        let ctx = SessionContext::new();
        let pending = ctx.begin_navigation(None);
        ctx.update(|s| {
            apply_current_user(s, &alice());
            s.can_logout = true;
            s.resources_cleared = true;
        });

        ctx.clear();

        let session = ctx.snapshot();
        assert!(session.identity.is_none());
        assert!(!session.can_logout);
        assert!(!session.resources_cleared);
        assert!(!ctx.is_current(pending));
    }
}
