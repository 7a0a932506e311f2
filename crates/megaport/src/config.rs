//! Client configuration
//!
//! Environments, endpoints and the knobs shared by every service.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::Credentials;
use crate::error::{Error, Result};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between provisioning status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Megaport API environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl Environment {
    /// API base URL for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.megaport.com/",
            Environment::Staging => "https://api-staging.megaport.com/",
            Environment::Development => "https://api-mpone-dev.megaport.com/",
        }
    }

    /// OAuth2 token endpoint for this environment
    pub fn auth_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://auth-m2m.megaport.com/oauth2/token",
            Environment::Staging => "https://auth-m2m-staging.megaport.com/oauth2/token",
            Environment::Development => "https://auth-m2m-mpone-dev.megaport.com/oauth2/token",
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(Error::Config(format!("unknown environment {}", other))),
        }
    }
}

/// Configuration for the Megaport client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_url: String,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub user_agent: String,
    pub custom_headers: HashMap<String, String>,
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl ClientConfig {
    /// Configuration pointing at the given environment, without credentials
    pub fn new(environment: Environment) -> Self {
        Self {
            base_url: environment.base_url().to_string(),
            auth_url: environment.auth_url().to_string(),
            credentials: Credentials::None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("megaport-rust/{}", crate::VERSION),
            custom_headers: HashMap::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Build a configuration from `MEGAPORT_*` environment variables.
    ///
    /// `MEGAPORT_ACCESS_TOKEN` wins over an access/secret key pair.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("MEGAPORT_ENVIRONMENT") {
            Some(env) if !env.is_empty() => env.parse()?,
            _ => Environment::Production,
        };

        let mut config = Self::new(environment);

        if let Some(base_url) = lookup("MEGAPORT_BASE_URL").filter(|v| !v.is_empty()) {
            config = config.with_base_url(base_url);
        }

        let token = lookup("MEGAPORT_ACCESS_TOKEN").filter(|v| !v.is_empty());
        let access_key = lookup("MEGAPORT_ACCESS_KEY").filter(|v| !v.is_empty());
        let secret_key = lookup("MEGAPORT_SECRET_KEY").filter(|v| !v.is_empty());

        config.credentials = match (token, access_key, secret_key) {
            (Some(token), _, _) => Credentials::bearer(token),
            (None, Some(access), Some(secret)) => Credentials::access_key(access, secret),
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(Error::Config(
                    "both MEGAPORT_ACCESS_KEY and MEGAPORT_SECRET_KEY must be set".to_string(),
                ))
            }
            (None, None, None) => Credentials::None,
        };

        Ok(config)
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Override the API base URL. A trailing slash is added when missing.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every API request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Must be non-zero, which [`Client::with_config`](crate::Client::with_config) checks
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
