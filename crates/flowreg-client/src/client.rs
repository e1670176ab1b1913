//! reqwest-backed `RegistryApi`

use async_trait::async_trait;
use flowreg_core::effects::{ApiError, BearerTokenProvider, RegistryApi};
use flowreg_core::{Bucket, ConsoleConfig, CurrentUser, Droplet, TenantRef, User, UserGroup};
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::endpoints;

/// HTTP client for the registry REST API.
///
/// Requests carry `Authorization: Bearer <token>` whenever the configured
/// [`BearerTokenProvider`] has a token. Nothing is retried.
#[derive(Clone)]
pub struct HttpRegistryClient {
    api_base: String,
    client: reqwest::Client,
    tokens: Option<Arc<dyn BearerTokenProvider>>,
}

impl std::fmt::Debug for HttpRegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistryClient")
            .field("api_base", &self.api_base)
            .field("has_token_provider", &self.tokens.is_some())
            .finish()
    }
}

impl HttpRegistryClient {
    /// Create a client rooted at `api_base` (e.g. `http://host:18080/nifi-registry-api`).
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            tokens: None,
        }
    }

    /// Create a client from console configuration.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_base: config.api_base(),
            client,
            tokens: None,
        })
    }

    /// Attach the source of bearer tokens.
    pub fn with_token_provider(mut self, tokens: Arc<dyn BearerTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Base URL every endpoint is joined onto.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "registry request");
        let builder = self.client.request(method, url);
        match &self.tokens {
            Some(tokens) => match tokens.bearer_token().await {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            },
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Registry request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), %body, "registry request rejected");
        Err(ApiError::http(status.as_u16(), body))
    }

    async fn text(builder: RequestBuilder) -> Result<String, ApiError> {
        Self::send(builder)
            .await?
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to read response body: {e}")))
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let body = Self::text(builder).await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("Failed to parse registry response: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::json(self.request(Method::GET, path).await).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::json(self.request(Method::DELETE, path).await).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self
            .request(method, path)
            .await
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);
        Self::json(builder).await
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryClient {
    async fn get_buckets(&self) -> Result<Vec<Bucket>, ApiError> {
        self.get_json(endpoints::BUCKETS).await
    }

    async fn get_bucket(&self, bucket_id: &str, verbose: bool) -> Result<Bucket, ApiError> {
        self.get_json(&endpoints::bucket(bucket_id, verbose)).await
    }

    async fn create_bucket(&self, name: &str) -> Result<Bucket, ApiError> {
        self.send_json(
            Method::POST,
            endpoints::BUCKETS,
            &endpoints::CreateBucketBody { name },
        )
        .await
    }

    async fn delete_bucket(&self, bucket_id: &str) -> Result<Bucket, ApiError> {
        self.delete_json(&endpoints::bucket(bucket_id, false)).await
    }

    async fn get_droplets(&self, bucket_id: Option<&str>) -> Result<Vec<Droplet>, ApiError> {
        self.get_json(&endpoints::items(bucket_id)).await
    }

    async fn get_droplet(
        &self,
        bucket_id: &str,
        droplet_type: &str,
        droplet_id: &str,
        verbose: bool,
    ) -> Result<Droplet, ApiError> {
        self.get_json(&endpoints::droplet(
            bucket_id,
            droplet_type,
            droplet_id,
            verbose,
        ))
        .await
    }

    async fn delete_droplet(&self, droplet_uri: &str) -> Result<Droplet, ApiError> {
        self.delete_json(&endpoints::droplet_uri(droplet_uri)).await
    }

    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json(endpoints::USERS).await
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.get_json(&endpoints::user(user_id)).await
    }

    async fn add_user(&self, identity: &str) -> Result<User, ApiError> {
        self.send_json(
            Method::POST,
            endpoints::USERS,
            &endpoints::AddUserBody { identity },
        )
        .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.delete_json(&endpoints::user(user_id)).await
    }

    async fn get_user_groups(&self) -> Result<Vec<UserGroup>, ApiError> {
        self.get_json(endpoints::USER_GROUPS).await
    }

    async fn get_user_group(&self, group_id: &str) -> Result<UserGroup, ApiError> {
        self.get_json(&endpoints::user_group(group_id)).await
    }

    async fn create_user_group(
        &self,
        name: &str,
        members: &[TenantRef],
    ) -> Result<UserGroup, ApiError> {
        self.send_json(
            Method::POST,
            endpoints::USER_GROUPS,
            &endpoints::UserGroupBody {
                identifier: None,
                identity: name,
                users: members,
            },
        )
        .await
    }

    async fn update_user_group(
        &self,
        group_id: &str,
        name: &str,
        members: &[TenantRef],
    ) -> Result<UserGroup, ApiError> {
        self.send_json(
            Method::PUT,
            &endpoints::user_group(group_id),
            &endpoints::UserGroupBody {
                identifier: Some(group_id),
                identity: name,
                users: members,
            },
        )
        .await
    }

    async fn delete_user_group(&self, group_id: &str) -> Result<UserGroup, ApiError> {
        self.delete_json(&endpoints::user_group(group_id)).await
    }

    async fn ticket_exchange(&self) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, endpoints::KERBEROS_TOKEN)
            .await
            .header(header::CONTENT_TYPE, "application/json");
        Self::text(builder).await
    }

    async fn load_current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get_json(endpoints::ACCESS).await
    }

    async fn post_to_login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let url = self.url(endpoints::LOGIN_TOKEN);
        tracing::debug!(%url, username, "registry login");
        let builder = self
            .client
            .post(url)
            .basic_auth(username, Some(password))
            .header(header::CONTENT_TYPE, "application/json");
        Self::text(builder).await
    }
}
