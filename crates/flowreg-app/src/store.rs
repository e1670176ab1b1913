//! Local expiring store
//!
//! Key/value entries with an expiration timestamp, kept in any
//! [`StorageEffects`] backend. Each entry is stored as the JSON document
//! `{"expires": <epoch ms>, "item": <value>}`.
//!
//! Expired entries are evicted lazily when read; [`LocalExpiringStore::init`]
//! touches every key once to sweep what already expired. No operation here
//! returns an error: backend and parse failures are logged and read as
//! "absent".

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flowreg_core::effects::{BearerTokenProvider, PhysicalTimeEffects, StorageEffects, TimeEffects};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Key holding the session token.
pub const JWT_KEY: &str = "jwt";

/// Lifetime of entries written without an explicit expiration (two days).
pub const DEFAULT_TTL_MS: i64 = 172_800_000;

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    expires: Option<i64>,
    #[serde(default)]
    item: Option<Value>,
}

/// Expiring key/value store over a storage backend and a clock.
#[derive(Clone)]
pub struct LocalExpiringStore {
    storage: Arc<dyn StorageEffects>,
    time: Arc<dyn PhysicalTimeEffects>,
}

impl std::fmt::Debug for LocalExpiringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalExpiringStore").finish_non_exhaustive()
    }
}

impl LocalExpiringStore {
    /// Store over `storage`, reading expirations against `time`.
    pub fn new(storage: Arc<dyn StorageEffects>, time: Arc<dyn PhysicalTimeEffects>) -> Self {
        Self { storage, time }
    }

    async fn now_ms(&self) -> i64 {
        self.time.current_timestamp_ms().await
    }

    async fn read_entry(&self, key: &str) -> Option<StoredEntry> {
        let bytes = match self.storage.retrieve(key).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored entry");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(key, error = %e, "ignoring malformed stored entry");
                None
            }
        }
    }

    /// Store `value` under `key`, expiring at `expires_at_ms` or two days from now.
    pub async fn set_item<V>(&self, key: &str, value: &V, expires_at_ms: Option<i64>)
    where
        V: Serialize + ?Sized + Sync,
    {
        let item = match serde_json::to_value(value) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize entry");
                return;
            }
        };
        let expires = match expires_at_ms {
            Some(at) => at,
            None => self.now_ms().await.saturating_add(DEFAULT_TTL_MS),
        };
        let entry = StoredEntry {
            expires: Some(expires),
            item: Some(item),
        };
        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to encode entry");
                return;
            }
        };
        if let Err(e) = self.storage.store(key, bytes).await {
            tracing::warn!(key, error = %e, "failed to write entry");
        }
    }

    /// The stored item, or `None` when absent, malformed or expired.
    ///
    /// An entry whose expiration is strictly before now is removed.
    pub async fn get_item(&self, key: &str) -> Option<Value> {
        let entry = self.read_entry(key).await?;
        if let Some(expires) = entry.expires {
            if expires < self.now_ms().await {
                tracing::debug!(key, expires, "evicting expired entry");
                self.remove_item(key).await;
                return None;
            }
        }
        entry.item
    }

    /// [`get_item`](Self::get_item) decoded into `T`.
    pub async fn get_item_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        serde_json::from_value(self.get_item(key).await?).ok()
    }

    /// Whether an entry exists, expired or not. Never evicts.
    pub async fn has_item(&self, key: &str) -> bool {
        match self.storage.exists(key).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to check stored entry");
                false
            }
        }
    }

    /// Raw stored expiration in epoch milliseconds.
    pub async fn get_item_expiration(&self, key: &str) -> Option<i64> {
        self.read_entry(key).await?.expires
    }

    /// Remove `key`; failures are logged.
    pub async fn remove_item(&self, key: &str) {
        if let Err(e) = self.storage.remove(key).await {
            tracing::warn!(key, error = %e, "failed to remove entry");
        }
    }

    /// Read every stored key once so expired entries are evicted.
    pub async fn init(&self) {
        let keys = match self.storage.list_keys(None).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list stored entries");
                return;
            }
        };
        for key in keys {
            let _ = self.get_item(&key).await;
        }
    }

    // ─── Session token ───────────────────────────────────────

    /// Store a session token under [`JWT_KEY`], expiring with its `exp` claim.
    ///
    /// Tokens without a readable `exp` get the default lifetime. Returns the
    /// expiration that was requested, if it came from the token.
    pub async fn store_session_token(&self, jwt: &str) -> Option<i64> {
        let expires = decode_session_token(Some(jwt))
            .as_ref()
            .and_then(token_expiration_ms);
        if expires.is_none() {
            tracing::debug!("session token carries no exp claim, using default lifetime");
        }
        self.set_item(JWT_KEY, jwt, expires).await;
        expires
    }

    /// The unexpired session token, if any.
    pub async fn session_token(&self) -> Option<String> {
        self.get_item_as(JWT_KEY).await
    }

    /// Whether a session token entry exists, without eviction.
    pub async fn has_session_token(&self) -> bool {
        self.has_item(JWT_KEY).await
    }

    /// Drop the session token.
    pub async fn clear_session_token(&self) {
        self.remove_item(JWT_KEY).await;
    }

    /// See [`decode_session_token`](crate::store::decode_session_token).
    pub fn decode_session_token(&self, token: Option<&str>) -> Option<Value> {
        decode_session_token(token)
    }
}

#[async_trait]
impl BearerTokenProvider for LocalExpiringStore {
    async fn bearer_token(&self) -> Option<String> {
        self.session_token().await
    }
}

/// Decode the payload (middle segment) of a three-segment token.
///
/// Accepts standard or URL-safe base64, padded or not. Returns `None` for a
/// missing token, a segment count other than three, undecodable data, or a
/// payload of JSON `null`.
pub fn decode_session_token(token: Option<&str>) -> Option<Value> {
    let token = token?;
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return None;
    };
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Null => None,
        value => Some(value),
    }
}

/// `exp` (seconds) converted to milliseconds.
pub fn token_expiration_ms(payload: &Value) -> Option<i64> {
    let exp = payload.get("exp")?;
    let seconds = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|f| f as i64))?;
    seconds.checked_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use flowreg_effects::MemoryStorageHandler;
    use flowreg_testkit::ControllableClock;
    use serde_json::json;

    fn store_at(now_ms: i64) -> (LocalExpiringStore, Arc<MemoryStorageHandler>, ControllableClock) {
        let storage = Arc::new(MemoryStorageHandler::new());
        let clock = ControllableClock::new(now_ms);
        let store = LocalExpiringStore::new(storage.clone(), Arc::new(clock.clone()));
        (store, storage, clock)
    }

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let (store, _, _) = store_at(1_000);
        let value = json!({"bucket": "b-1", "filters": ["prod", 3]});

        store.set_item("view", &value, None).await;

        assert_eq!(store.get_item("view").await, Some(value));
        assert_eq!(
            store.get_item_expiration("view").await,
            Some(1_000 + DEFAULT_TTL_MS)
        );
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted_on_read() {
        let (store, _, clock) = store_at(10_000);
        store.set_item("k", "v", Some(10_500)).await;

        clock.set_ms(10_500);
        assert_eq!(store.get_item("k").await, Some(json!("v")));

        clock.advance_ms(1);
        assert!(store.has_item("k").await);
        assert_eq!(store.get_item("k").await, None);
        assert!(!store.has_item("k").await);
    }

    #[tokio::test]
    async fn test_has_item_does_not_evict() {
        let (store, _, _) = store_at(10_000);
        store.set_item("k", "v", Some(1)).await;

        assert!(store.has_item("k").await);
        assert!(store.has_item("k").await);
        assert_eq!(store.get_item_expiration("k").await, Some(1));
    }

    #[tokio::test]
    async fn test_tolerates_malformed_entries() {
        let (store, storage, _) = store_at(0);
        storage.store("garbage", b"not json".to_vec()).await.unwrap();
        storage.store("no-expiry", br#"{"item": 7}"#.to_vec()).await.unwrap();
        storage.store("no-item", br#"{"expires": 99}"#.to_vec()).await.unwrap();
        storage.store("scalar", b"42".to_vec()).await.unwrap();

        assert_eq!(store.get_item("garbage").await, None);
        assert_eq!(store.get_item("no-expiry").await, Some(json!(7)));
        assert_eq!(store.get_item("no-item").await, None);
        assert_eq!(store.get_item("scalar").await, None);
        assert_eq!(store.get_item("missing").await, None);
        assert_eq!(store.get_item_expiration("no-expiry").await, None);
    }

    #[tokio::test]
    async fn test_init_sweeps_expired_and_survives_garbage() {
        let (store, storage, _) = store_at(5_000);
        store.set_item("stale", &1, Some(4_000)).await;
        store.set_item("fresh", &2, Some(6_000)).await;
        storage.store("garbage", b"{".to_vec()).await.unwrap();

        store.init().await;

        assert!(!store.has_item("stale").await);
        assert!(store.has_item("fresh").await);
        assert!(store.has_item("garbage").await);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_noop() {
        let (store, _, _) = store_at(0);
        store.remove_item("nothing").await;
        assert!(!store.has_item("nothing").await);
    }

    #[test]
    fn test_decode_session_token() {
        assert_eq!(
            decode_session_token(Some("a.eyJleHAiOjF9.c")),
            Some(json!({"exp": 1}))
        );
        assert_eq!(decode_session_token(None), None);
        assert_eq!(decode_session_token(Some("a.eyJleHAiOjF9")), None);
        assert_eq!(decode_session_token(Some("a.b.c.d")), None);
        assert_eq!(decode_session_token(Some("a.!!!.c")), None);
        // "null"
        assert_eq!(decode_session_token(Some("a.bnVsbA.c")), None);
    }

    #[test]
    fn test_decode_accepts_both_alphabets() {
        let payload = br#"{"sub":"alice?>>"}"#;
        let standard = STANDARD.encode(payload);
        let url_safe = URL_SAFE_NO_PAD.encode(payload);
        assert_ne!(standard.trim_end_matches('='), url_safe);

        let expected = Some(json!({"sub": "alice?>>"}));
        assert_eq!(decode_session_token(Some(&format!("h.{standard}.s"))), expected);
        assert_eq!(decode_session_token(Some(&format!("h.{url_safe}.s"))), expected);
    }

    #[tokio::test]
    async fn test_session_token_expires_with_exp_claim() {
        let (store, _, clock) = store_at(1_000_000);
        let token = flowreg_testkit::fixtures::session_token("alice", 2_000);

        assert_eq!(store.store_session_token(&token).await, Some(2_000_000));
        assert_eq!(store.bearer_token().await, Some(token.clone()));

        clock.set_ms(2_000_001);
        assert_eq!(store.bearer_token().await, None);
        assert!(!store.has_session_token().await);
    }

    #[tokio::test]
    async fn test_opaque_token_gets_default_lifetime() {
        let (store, _, _) = store_at(0);
        assert_eq!(store.store_session_token("opaque").await, None);
        assert_eq!(store.get_item_expiration(JWT_KEY).await, Some(DEFAULT_TTL_MS));
        assert_eq!(store.session_token().await.as_deref(), Some("opaque"));
    }
}
