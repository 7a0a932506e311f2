//! HTTP client
//!
//! One shared transport for every service. Requests are authenticated with a
//! bearer token from the configured [`TokenProvider`], responses are decoded
//! from the `{message, terms, data}` envelope and non-2xx statuses become
//! [`Error::Api`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::services;
use crate::types::ApiResponse;

const TRACE_ID_HEADER: &str = "Trace-Id";

/// Megaport API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    base_url: Url,
    http: reqwest::Client,
    auth: Option<Arc<dyn TokenProvider>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.auth.is_some())
            .finish()
    }
}

impl Client {
    /// Create a client for the production API using a pre-issued token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(
            ClientConfig::default().with_credentials(crate::auth::Credentials::bearer(token)),
        )
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if config.poll_interval.is_zero() {
            return Err(Error::Config("poll interval must be non-zero".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| Error::Config(format!("invalid user agent {}", config.user_agent)))?,
        );
        for (name, value) in &config.custom_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::Config(format!("invalid header name {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::Config(format!("invalid value for header {}", name)))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let auth = config
            .credentials
            .clone()
            .into_provider(http.clone(), &config.auth_url);

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                base_url,
                http,
                auth,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.inner.config.poll_interval
    }

    pub fn ports(&self) -> services::PortService {
        services::PortService::new(self.clone())
    }

    pub fn mcrs(&self) -> services::McrService {
        services::McrService::new(self.clone())
    }

    pub fn mves(&self) -> services::MveService {
        services::MveService::new(self.clone())
    }

    pub fn vxcs(&self) -> services::VxcService {
        services::VxcService::new(self.clone())
    }

    pub fn locations(&self) -> services::LocationService {
        services::LocationService::new(self.clone())
    }

    pub fn service_keys(&self) -> services::ServiceKeyService {
        services::ServiceKeyService::new(self.clone())
    }

    pub fn partners(&self) -> services::PartnerService {
        services::PartnerService::new(self.clone())
    }

    pub fn users(&self) -> services::UserManagementService {
        services::UserManagementService::new(self.clone())
    }

    pub fn products(&self) -> services::ProductService {
        services::ProductService::new(self.clone())
    }

    /// GET and return the envelope's `data`
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, query, None)
            .await
            .map(|resp| resp.data)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::POST, path, &[], Some(body))
            .await
            .map(|resp| resp.data)
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.request(Method::PUT, path, &[], Some(body))
            .await
            .map(|resp| resp.data)
    }

    /// GET a path assembled from raw segments, each percent-encoded
    pub(crate) async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!("base URL {} cannot take a path", self.inner.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        self.execute::<T, ()>(Method::GET, url, &[], None)
            .await
            .map(|resp| resp.data)
    }

    /// Send a request whose response carries no data worth decoding
    pub(crate) async fn send(&self, method: Method, path: &str) -> Result<String> {
        self.request::<Option<serde_json::Value>, ()>(method, path, &[], None)
            .await
            .map(|resp| resp.message)
    }

    pub(crate) async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResponse<T>> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        self.execute(method, url, query, body).await
    }

    async fn execute<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        mut url: Url,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResponse<T>> {
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let mut request = self.inner.http.request(method.clone(), url.clone());
        if let Some(auth) = &self.inner.auth {
            request = request.bearer_auth(auth.access_token().await?);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            trace_id = trace_id.as_deref().unwrap_or(""),
            "Megaport API request"
        );

        let body_bytes = response.bytes().await?;

        if status.is_success() {
            let bytes: &[u8] = if body_bytes.iter().all(u8::is_ascii_whitespace) {
                b"{}"
            } else {
                &body_bytes
            };
            return Ok(serde_json::from_slice(bytes)?);
        }

        let error = api_error(&method, &url, status.as_u16(), trace_id, &body_bytes);
        tracing::warn!(error = %error, "Megaport API returned an error");
        Err(error)
    }
}

/// Map an error response to [`Error::Api`]
fn api_error(
    method: &Method,
    url: &Url,
    status_code: u16,
    trace_id: Option<String>,
    body: &[u8],
) -> Error {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default, deserialize_with = "crate::types::null_as_default")]
        message: String,
        #[serde(default)]
        data: Option<serde_json::Value>,
    }

    let (message, data) = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => {
            let data = match parsed.data {
                Some(serde_json::Value::String(s)) => s,
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            (parsed.message, data)
        }
        Err(_) => (String::from_utf8_lossy(body).to_string(), String::new()),
    };

    Error::Api {
        method: method.to_string(),
        url: url.to_string(),
        status_code,
        message,
        data,
        trace_id,
    }
}
