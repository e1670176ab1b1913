//! Registry API effect interface
//!
//! The REST facade the application core talks to. Every operation is a single
//! asynchronous request with no retry; failures come back as [`ApiError`]
//! carrying the raw response body. Presenting the failure (the generic
//! "Error" modal) is the caller's job, not the facade's.
//!
//! # Effect Classification
//!
//! - **Category**: Remote Effect
//! - **Implementation**: `flowreg-client` (reqwest), scripted mock in `flowreg-testkit`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{Bucket, CurrentUser, Droplet, TenantRef, User, UserGroup};

/// Uniform error surfaced by every registry operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response
    #[error("Transport error: {message}")]
    Transport {
        /// Transport failure description
        message: String,
    },

    /// The response body could not be decoded
    #[error("Decode error: {message}")]
    Decode {
        /// Decoder failure description
        message: String,
    },
}

impl ApiError {
    /// Create an HTTP status error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status, when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text shown to the user: the raw body for HTTP errors, the message otherwise.
    pub fn body(&self) -> &str {
        match self {
            Self::Http { body, .. } => body,
            Self::Transport { message } | Self::Decode { message } => message,
        }
    }
}

/// Source of the session token attached as `Authorization: Bearer <token>`.
#[async_trait]
pub trait BearerTokenProvider: Send + Sync {
    /// The current token, if one is stored and not expired.
    async fn bearer_token(&self) -> Option<String>;
}

/// REST facade over the registry backend.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    // ─── Buckets ─────────────────────────────────────────────

    /// `GET /buckets`
    async fn get_buckets(&self) -> Result<Vec<Bucket>, ApiError>;

    /// `GET /buckets/{id}[?verbose=true]`
    async fn get_bucket(&self, bucket_id: &str, verbose: bool) -> Result<Bucket, ApiError>;

    /// `POST /buckets {name}`
    async fn create_bucket(&self, name: &str) -> Result<Bucket, ApiError>;

    /// `DELETE /buckets/{id}`
    async fn delete_bucket(&self, bucket_id: &str) -> Result<Bucket, ApiError>;

    // ─── Droplets ────────────────────────────────────────────

    /// `GET /items[/{bucketId}]`
    async fn get_droplets(&self, bucket_id: Option<&str>) -> Result<Vec<Droplet>, ApiError>;

    /// `GET /buckets/{bucketId}/{type}/{id}[?verbose=true]`
    async fn get_droplet(
        &self,
        bucket_id: &str,
        droplet_type: &str,
        droplet_id: &str,
        verbose: bool,
    ) -> Result<Droplet, ApiError>;

    /// `DELETE /{dropletUri}`
    async fn delete_droplet(&self, droplet_uri: &str) -> Result<Droplet, ApiError>;

    // ─── Tenants ─────────────────────────────────────────────

    /// `GET /tenants/users`
    async fn get_users(&self) -> Result<Vec<User>, ApiError>;

    /// `GET /tenants/users/{id}`
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError>;

    /// `POST /tenants/users {identity}`
    async fn add_user(&self, identity: &str) -> Result<User, ApiError>;

    /// `DELETE /tenants/users/{id}`
    async fn delete_user(&self, user_id: &str) -> Result<User, ApiError>;

    /// `GET /tenants/user-groups`
    async fn get_user_groups(&self) -> Result<Vec<UserGroup>, ApiError>;

    /// `GET /tenants/user-groups/{id}`
    async fn get_user_group(&self, group_id: &str) -> Result<UserGroup, ApiError>;

    /// `POST /tenants/user-groups {identity, users}`
    async fn create_user_group(
        &self,
        name: &str,
        members: &[TenantRef],
    ) -> Result<UserGroup, ApiError>;

    /// `PUT /tenants/user-groups/{id} {identifier, identity, users}`
    async fn update_user_group(
        &self,
        group_id: &str,
        name: &str,
        members: &[TenantRef],
    ) -> Result<UserGroup, ApiError>;

    /// `DELETE /tenants/user-groups/{id}`
    async fn delete_user_group(&self, group_id: &str) -> Result<UserGroup, ApiError>;

    // ─── Access ──────────────────────────────────────────────

    /// Exchange ambient credentials (Kerberos/SPNEGO ticket) for a session token.
    async fn ticket_exchange(&self) -> Result<String, ApiError>;

    /// `GET /access`
    async fn load_current_user(&self) -> Result<CurrentUser, ApiError>;

    /// Exchange a username/password for a session token.
    async fn post_to_login(&self, username: &str, password: &str) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = ApiError::http(401, "Unable to validate the access token.");
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(err.body(), "Unable to validate the access token.");

        let err = ApiError::transport("connection refused");
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
        assert_eq!(err.body(), "connection refused");
    }
}
