//! Error types for the Megaport SDK

use std::time::Duration;

use thiserror::Error;

/// Result type alias for Megaport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Megaport SDK operations
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response returned by the API
    #[error("{method} {url}: {status_code} (trace_id {trace_id:?}) {message} {data}")]
    Api {
        method: String,
        url: String,
        status_code: u16,
        message: String,
        data: String,
        trace_id: Option<String>,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Token exchange failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Order rejected before it was sent
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid contract term {0}, must be one of 1, 12, 24 or 36 months")]
    InvalidTerm(u32),

    #[error("invalid port speed {0}, must be one of 1000, 10000 or 100000")]
    InvalidPortSpeed(u32),

    #[error("invalid MCR port speed {0}, must be one of 1000, 2500, 5000, 10000, 25000, 50000 or 100000")]
    InvalidMcrPortSpeed(u32),

    #[error("invalid VLAN {0}, must be -1 (untagged), 0 (auto) or between 2 and 4093")]
    InvalidVlan(i32),

    #[error("product type {0} cannot be modified, must be one of megaport, mcr2 or mve")]
    WrongProductModify(String),

    #[error("port {0} is already locked")]
    PortAlreadyLocked(String),

    #[error("port {0} is not locked")]
    PortNotLocked(String),

    #[error("location {0} not found")]
    LocationNotFound(String),

    #[error("no locations match {0}")]
    NoMatchingLocations(String),

    #[error("invalid market code {0}")]
    InvalidMarketCode(String),

    #[error("no partner ports found")]
    NoPartnerPortsFound,

    #[error("no available partner port found for speed {0}")]
    NoAvailablePartnerPort(u32),

    #[error("invalid a-end partner config, only VROUTER is supported")]
    InvalidVxcAEndPartnerConfig,

    #[error("service key {0} not found")]
    ServiceKeyNotFound(String),

    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error("invalid user position {0}")]
    InvalidUserPosition(String),

    #[error("order response did not contain any service UIDs")]
    EmptyOrderResponse,

    /// Provisioning or update did not settle in time
    #[error("time expired waiting for {resource} {uid} after {waited:?}")]
    WaitTimeout {
        resource: &'static str,
        uid: String,
        waited: Duration,
    },

    /// Wait was cancelled by the caller
    #[error("wait for {resource} {uid} cancelled")]
    Cancelled { resource: &'static str, uid: String },
}

impl Error {
    /// Returns the HTTP status code for API errors
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a validation error (400 or client-side)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::Api { status_code: 400, .. }
                | Error::Validation(_)
                | Error::InvalidTerm(_)
                | Error::InvalidPortSpeed(_)
                | Error::InvalidMcrPortSpeed(_)
                | Error::InvalidVlan(_)
                | Error::InvalidUserPosition(_)
                | Error::InvalidVxcAEndPartnerConfig
        )
    }

    /// Returns true if this is an authentication error (401)
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 401, .. } | Error::Auth(_))
    }

    /// Returns true if this is an authorization error (403)
    pub fn is_authorization_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 403, .. })
    }

    /// Returns true if this is a not found error (404)
    pub fn is_not_found_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 404, .. })
    }

    /// Returns true if a wait gave up before the resource was ready
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::WaitTimeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
