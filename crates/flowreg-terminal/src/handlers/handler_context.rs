//! Shared handler context and console wiring.

use anyhow::{Context, Result};
use flowreg_app::{ConsoleCore, LocalExpiringStore};
use flowreg_client::HttpRegistryClient;
use flowreg_core::effects::{RegistryApi, StorageEffects};
use flowreg_core::ConsoleConfig;
use flowreg_effects::{FilesystemStorageHandler, MemoryStorageHandler, RealTimeHandler};
use std::sync::Arc;

/// What every handler needs: the console core and the resolved config.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    core: ConsoleCore,
    config: ConsoleConfig,
}

impl HandlerContext {
    /// Context over an already wired console.
    pub fn new(core: ConsoleCore, config: ConsoleConfig) -> Self {
        Self { core, config }
    }

    /// Wire the HTTP client, the token store and the console core.
    ///
    /// The store doubles as the client's bearer token source.
    pub async fn connect(config: ConsoleConfig) -> Result<Self> {
        let storage: Arc<dyn StorageEffects> = match &config.store_path {
            Some(path) => Arc::new(
                FilesystemStorageHandler::open(path)
                    .await
                    .with_context(|| format!("opening store {}", path.display()))?,
            ),
            None => Arc::new(MemoryStorageHandler::new()),
        };
        let store = LocalExpiringStore::new(storage, Arc::new(RealTimeHandler::new()));

        let client = HttpRegistryClient::from_config(&config)?
            .with_token_provider(Arc::new(store.clone()));
        tracing::debug!(api = client.api_base(), "registry client ready");

        let api: Arc<dyn RegistryApi> = Arc::new(client);
        let core = ConsoleCore::new(api, store).with_buckets_check(config.buckets_permission_check);
        core.start().await;
        Ok(Self::new(core, config))
    }

    /// The console core.
    pub fn core(&self) -> &ConsoleCore {
        &self.core
    }

    /// Loaded configuration.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Whether tokens survive this process.
    pub fn persists_tokens(&self) -> bool {
        self.config.store_path.is_some()
    }
}
