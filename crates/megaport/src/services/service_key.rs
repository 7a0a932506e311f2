//! Service keys
//!
//! A service key lets another Megaport customer connect a VXC to one of your
//! ports without needing access to your account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidFor {
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceKey {
    pub key: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_name: String,
    #[serde(default)]
    pub vlan: Option<i32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub max_speed: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub pre_approved: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub single_use: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub active: bool,
    #[serde(default)]
    pub valid_for: Option<ValidFor>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub expired: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub valid: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub promo_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceKeyRequest {
    pub product_uid: String,
    pub single_use: bool,
    /// Maximum VXC speed in Mbps
    pub max_speed: u32,
    pub active: bool,
    pub pre_approved: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Required for single-use keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<ValidFor>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub promo_code: String,
}

impl CreateServiceKeyRequest {
    fn validate(&self) -> Result<()> {
        if self.product_uid.is_empty() {
            return Err(Error::Validation("product UID is required".to_string()));
        }
        if self.single_use && self.vlan.is_none() {
            return Err(Error::Validation(
                "single-use service keys require a VLAN".to_string(),
            ));
        }
        if let Some(vlan) = self.vlan {
            crate::types::validate_vlan(vlan)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceKeyRequest {
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_uid: String,
    pub single_use: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<ValidFor>,
}

/// The key lookup answers with either a single key or a list
#[derive(Deserialize)]
#[serde(untagged)]
enum KeyLookup {
    One(ServiceKey),
    Many(Vec<ServiceKey>),
}

pub struct ServiceKeyService {
    client: Client,
}

impl ServiceKeyService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a key and return its value
    pub async fn create_service_key(&self, req: CreateServiceKeyRequest) -> Result<String> {
        req.validate()?;
        let created: ServiceKey = self.client.post("/v2/service/key", &req).await?;
        tracing::info!(product_uid = %req.product_uid, "Service key created");
        Ok(created.key)
    }

    /// All keys, or only those issued for `product_uid`
    pub async fn list_service_keys(&self, product_uid: Option<&str>) -> Result<Vec<ServiceKey>> {
        let query: Vec<(&str, String)> = product_uid
            .map(|uid| vec![("productIdOrUid", uid.to_string())])
            .unwrap_or_default();
        let keys: Option<Vec<ServiceKey>> = self.client.get("/v2/service/key", &query).await?;
        Ok(keys.unwrap_or_default())
    }

    pub async fn update_service_key(&self, req: UpdateServiceKeyRequest) -> Result<bool> {
        if req.key.is_empty() {
            return Err(Error::Validation("service key is required".to_string()));
        }
        let _: Option<serde_json::Value> = self.client.put("/v2/service/key", &req).await?;
        Ok(true)
    }

    pub async fn get_service_key(&self, key: &str) -> Result<ServiceKey> {
        let found: Option<KeyLookup> = self
            .client
            .get("/v2/service/key", &[("key", key.to_string())])
            .await?;
        let found = match found {
            Some(KeyLookup::One(k)) => Some(k),
            Some(KeyLookup::Many(keys)) => keys.into_iter().next(),
            None => None,
        };
        found.ok_or_else(|| Error::ServiceKeyNotFound(key.to_string()))
    }
}
