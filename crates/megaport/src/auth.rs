//! Authentication
//!
//! Requests carry a bearer token. The token comes from one of three places:
//! a static token supplied by the caller, an OAuth2 `client_credentials`
//! exchange using a Megaport access/secret key pair, or a caller-supplied
//! [`TokenProvider`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::{Error, Result};

/// Tokens are refreshed this long before they actually expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for API requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for the next request
    async fn access_token(&self) -> Result<String>;
}

/// How the client authenticates
#[derive(Clone, Default)]
pub enum Credentials {
    /// Unauthenticated requests (public endpoints such as locations)
    #[default]
    None,
    /// Pre-issued bearer token
    BearerToken(String),
    /// API key pair exchanged for an OAuth2 access token
    AccessKey {
        access_key: String,
        secret_key: String,
    },
    /// Pluggable token source
    Provider(Arc<dyn TokenProvider>),
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Credentials::BearerToken(token.into())
    }

    pub fn access_key(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Credentials::AccessKey {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn provider(provider: impl TokenProvider + 'static) -> Self {
        Credentials::Provider(Arc::new(provider))
    }

    /// Resolve into a token provider, if any authentication is configured
    pub(crate) fn into_provider(
        self,
        http: reqwest::Client,
        auth_url: &str,
    ) -> Option<Arc<dyn TokenProvider>> {
        match self {
            Credentials::None => None,
            Credentials::BearerToken(token) => Some(Arc::new(StaticToken(token))),
            Credentials::AccessKey {
                access_key,
                secret_key,
            } => Some(Arc::new(ClientCredentials::new(
                http,
                auth_url,
                access_key,
                secret_key,
            ))),
            Credentials::Provider(provider) => Some(provider),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
            Credentials::AccessKey { access_key, .. } => f
                .debug_struct("AccessKey")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .finish(),
            Credentials::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// A token that never changes
pub struct StaticToken(String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    expires_in: u64,
    #[serde(default)]
    token_type: Option<String>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// OAuth2 client-credentials exchange against the Megaport auth endpoint.
///
/// The token is reused until shortly before it expires.
pub struct ClientCredentials {
    http: reqwest::Client,
    token_url: String,
    access_key: String,
    secret_key: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientCredentials {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            cached: Mutex::new(None),
        }
    }

    async fn exchange(&self) -> Result<CachedToken> {
        tracing::debug!(url = %self.token_url, "Requesting access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Access token request rejected");
            return Err(Error::Auth(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        if let Some(kind) = token.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(Error::Auth(format!("unsupported token type {}", kind)));
            }
        }

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentials {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(current) = cached.as_ref() {
            if Instant::now() < current.expires_at {
                return Ok(current.token.clone());
            }
        }

        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
