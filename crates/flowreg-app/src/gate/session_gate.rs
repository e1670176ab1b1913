//! The session gate.

use flowreg_core::effects::RegistryApi;
use flowreg_core::{resources, BucketsPermissionCheck, CurrentUser};
use std::sync::Arc;

use super::types::{Activation, GateDecision, GateVariant, NavigationAttempt};
use crate::routes::{Location, Route};
use crate::session::{apply_current_user, Session, SessionContext};
use crate::store::LocalExpiringStore;
use crate::views::Notice;

/// Decides whether navigations may proceed, resolving the identity when the
/// session cannot answer on its own.
#[derive(Clone)]
pub struct SessionGate {
    api: Arc<dyn RegistryApi>,
    store: LocalExpiringStore,
    session: SessionContext,
    buckets_check: BucketsPermissionCheck,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("session", &self.session)
            .field("buckets_check", &self.buckets_check)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    /// Gate over `session`, resolving identities through `api`.
    pub fn new(
        api: Arc<dyn RegistryApi>,
        store: LocalExpiringStore,
        session: SessionContext,
    ) -> Self {
        Self {
            api,
            store,
            session,
            buckets_check: BucketsPermissionCheck::default(),
        }
    }

    /// Choose how the workflow-administration variant reads `buckets`
    /// after resolution.
    pub fn with_buckets_check(mut self, check: BucketsPermissionCheck) -> Self {
        self.buckets_check = check;
        self
    }

    /// Session the gate reads and writes.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ─── Synchronous check ───────────────────────────────────

    /// Allow immediately when the session already answers, otherwise start a
    /// pending attempt. Never touches the network.
    pub fn can_activate(&self, variant: GateVariant, url: &str) -> Activation {
        if self.session.read(|s| short_circuits(variant, s)) {
            tracing::debug!(variant = variant.name(), url, "gate short-circuit");
            return Activation::Allow;
        }

        // The login screen is never a useful place to return to.
        let redirect = (variant != GateVariant::Login).then_some(url);
        let generation = self.session.begin_navigation(redirect);
        tracing::debug!(variant = variant.name(), url, generation, "gate pending");
        Activation::Pending(NavigationAttempt {
            variant,
            url: url.to_string(),
            generation,
        })
    }

    // ─── Resolution ──────────────────────────────────────────

    /// Exchange credentials, load the identity, update the session and
    /// decide. The exchange always completes before the identity load starts.
    pub async fn resolve(&self, attempt: NavigationAttempt) -> GateDecision {
        self.exchange_ticket().await;

        let user = match self.api.load_current_user().await {
            Ok(user) => user,
            Err(error) if error.is_unauthorized() => {
                tracing::info!(url = %attempt.url, "session token rejected, signing in again");
                self.store.clear_session_token().await;
                if !self.session.is_current(attempt.generation) {
                    return GateDecision::Superseded;
                }
                return GateDecision::redirect(Route::Login);
            }
            Err(error) => {
                tracing::warn!(url = %attempt.url, error = %error, "identity resolution failed");
                if !self.session.is_current(attempt.generation) {
                    return GateDecision::Superseded;
                }
                return GateDecision::Stay { error };
            }
        };

        let has_token = self.store.has_session_token().await;
        let decision = self.session.update_if_current(attempt.generation, |session| {
            apply_current_user(session, &user);
            self.decide(attempt.variant, session, &user, has_token)
        });

        match decision {
            Some(decision) => {
                tracing::info!(
                    identity = %user.identity,
                    anonymous = user.anonymous,
                    variant = attempt.variant.name(),
                    ?decision,
                    "identity resolved"
                );
                decision
            }
            None => {
                tracing::debug!(url = %attempt.url, "navigation superseded, dropping resolution");
                GateDecision::Superseded
            }
        }
    }

    /// [`can_activate`](Self::can_activate) then, if pending,
    /// [`resolve`](Self::resolve).
    pub async fn authorize(&self, variant: GateVariant, url: &str) -> GateDecision {
        match self.can_activate(variant, url) {
            Activation::Allow => GateDecision::Allow,
            Activation::Pending(attempt) => self.resolve(attempt).await,
        }
    }

    /// Run every variant guarding `url`'s route, stopping at the first
    /// decision that is not `Allow`.
    pub async fn authorize_url(&self, url: &str) -> GateDecision {
        let location = Location::parse(url);
        for variant in GateVariant::chain_for(&location.route) {
            let decision = self.authorize(*variant, url).await;
            if !decision.is_allowed() {
                return decision;
            }
        }
        GateDecision::Allow
    }

    /// Reuse a stored token, otherwise try to exchange ambient credentials.
    /// Failures only mean there is no token; resolution continues.
    async fn exchange_ticket(&self) {
        if self.store.has_session_token().await {
            tracing::debug!("reusing stored session token");
            return;
        }
        match self.api.ticket_exchange().await {
            Ok(token) if !token.trim().is_empty() => {
                self.store.store_session_token(token.trim()).await;
                tracing::debug!("stored session token from ticket exchange");
            }
            Ok(_) => tracing::debug!("ticket exchange returned no token"),
            Err(error) => tracing::debug!(error = %error, "ticket exchange unavailable"),
        }
    }

    fn decide(
        &self,
        variant: GateVariant,
        session: &mut Session,
        user: &CurrentUser,
        has_token: bool,
    ) -> GateDecision {
        if user.anonymous {
            return match variant {
                GateVariant::UsersAdministration => {
                    GateDecision::redirect_with(Route::AdministrationWorkflow, Notice::NotConfigured)
                }
                GateVariant::Login | GateVariant::Resources | GateVariant::WorkflowAdministration => {
                    GateDecision::Allow
                }
            };
        }

        session.can_logout = has_token;

        if variant == GateVariant::Login {
            let target = session
                .redirect_url
                .as_deref()
                .map(Location::parse)
                .filter(|l| l.route != Route::Login)
                .unwrap_or_else(|| Route::Explorer.into());
            return GateDecision::Redirect {
                to: target,
                notice: None,
            };
        }

        if !session.has_top_level_read() {
            return GateDecision::redirect_with(Route::Explorer, Notice::AccessDenied);
        }

        let permitted = match variant {
            GateVariant::Resources => {
                session.resources_cleared = true;
                true
            }
            GateVariant::UsersAdministration => session.can_read(resources::TENANTS),
            GateVariant::WorkflowAdministration => self.buckets_check.evaluate(&session.permissions),
            GateVariant::Login => true,
        };

        if permitted {
            GateDecision::Allow
        } else {
            GateDecision::redirect_with(variant.fallback(), Notice::AccessDenied)
        }
    }
}

/// Whether the session alone lets `variant` through.
fn short_circuits(variant: GateVariant, session: &Session) -> bool {
    match variant {
        GateVariant::Login => session.is_known_anonymous(),
        GateVariant::Resources => session.resources_cleared,
        GateVariant::UsersAdministration => session.can_read(resources::TENANTS),
        GateVariant::WorkflowAdministration => {
            session.can_read(resources::BUCKETS) || session.is_known_anonymous()
        }
    }
}
