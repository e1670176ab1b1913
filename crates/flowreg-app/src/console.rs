//! The console core: registry API, expiring store, session and gate wired
//! together once and shared by every workflow.

use flowreg_core::effects::RegistryApi;
use flowreg_core::BucketsPermissionCheck;
use std::sync::Arc;

use crate::gate::SessionGate;
use crate::session::SessionContext;
use crate::store::LocalExpiringStore;

/// Application core handle. Cloning shares the same session.
#[derive(Clone)]
pub struct ConsoleCore {
    api: Arc<dyn RegistryApi>,
    store: LocalExpiringStore,
    session: SessionContext,
    gate: SessionGate,
}

impl std::fmt::Debug for ConsoleCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleCore")
            .field("session", &self.session)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl ConsoleCore {
    /// `store` should also be the token provider of `api`'s HTTP client so
    /// requests carry the session token.
    pub fn new(api: Arc<dyn RegistryApi>, store: LocalExpiringStore) -> Self {
        let session = SessionContext::new();
        let gate = SessionGate::new(api.clone(), store.clone(), session.clone());
        Self {
            api,
            store,
            session,
            gate,
        }
    }

    /// Choose how the gate reads `buckets` after resolution.
    pub fn with_buckets_check(mut self, check: BucketsPermissionCheck) -> Self {
        self.gate = self.gate.with_buckets_check(check);
        self
    }

    /// Sweep expired store entries.
    pub async fn start(&self) {
        self.store.init().await;
    }

    /// Registry API.
    pub fn api(&self) -> &dyn RegistryApi {
        self.api.as_ref()
    }

    /// Expiring local store holding the session token.
    pub fn store(&self) -> &LocalExpiringStore {
        &self.store
    }

    /// The shared session.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Session gate wired to the same session and store.
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }
}
