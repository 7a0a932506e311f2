//! Megaport Cloud Router (MCR)

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::services::product::{ModifyProductRequest, ProductService};
use crate::types::{
    map_to_tags, validate_contract_term, AssociatedProduct, ResourceTag, PRODUCT_MCR,
};
use crate::wait::{
    poll_until_ready, Provisioned, WaitOptions, DEFAULT_PROVISION_TIMEOUT, DEFAULT_UPDATE_TIMEOUT,
};

/// MCR speeds, in Mbps, that can be ordered
pub const VALID_MCR_PORT_SPEEDS: [u32; 7] = [1000, 2500, 5000, 10000, 25000, 50000, 100000];

/// A Megaport Cloud Router
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mcr {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_id: i64,
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_type: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub provisioning_status: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub created_by: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub terminate_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub market: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub location_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub port_speed: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub marketplace_visibility: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "vxcpermitted")]
    pub vxc_permitted: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub vxc_auto_approval: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub secondary_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cost_centre: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub contract_term_months: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub attribute_tags: HashMap<String, String>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub admin_locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cancelable: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub diversity_zone: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub resources: McrResources,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub associated_vxcs: Vec<AssociatedProduct>,
}

impl Provisioned for Mcr {
    fn provisioning_status(&self) -> &str {
        &self.provisioning_status
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct McrResources {
    #[serde(default)]
    pub virtual_router: Option<VirtualRouter>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualRouter {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub id: i64,
    #[serde(default)]
    pub mcr_asn: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "resource_name")]
    pub resource_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "resource_type")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub speed: u32,
}

/// Parameters for ordering an MCR
#[derive(Debug, Clone, Default)]
pub struct BuyMcrRequest {
    pub name: String,
    pub term: u32,
    pub port_speed: u32,
    pub location_id: i64,
    /// Private ASN; Megaport assigns 133937 when unset
    pub mcr_asn: Option<u32>,
    pub diversity_zone: String,
    pub cost_centre: String,
    pub promo_code: String,
    pub resource_tags: HashMap<String, String>,
    pub wait: WaitOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct McrOrder<'a> {
    location_id: i64,
    product_name: &'a str,
    product_type: &'static str,
    port_speed: u32,
    term: u32,
    config: McrOrderConfig<'a>,
    #[serde(skip_serializing_if = "str::is_empty")]
    cost_centre: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    promo_code: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource_tags: Vec<ResourceTag>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct McrOrderConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    mcr_asn: Option<u32>,
    #[serde(skip_serializing_if = "str::is_empty")]
    diversity_zone: &'a str,
}

impl BuyMcrRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("MCR name is required".to_string()));
        }
        validate_contract_term(self.term)?;
        if !VALID_MCR_PORT_SPEEDS.contains(&self.port_speed) {
            return Err(Error::InvalidMcrPortSpeed(self.port_speed));
        }
        Ok(())
    }

    fn to_order(&self) -> Vec<McrOrder<'_>> {
        vec![McrOrder {
            location_id: self.location_id,
            product_name: &self.name,
            product_type: PRODUCT_MCR,
            port_speed: self.port_speed,
            term: self.term,
            config: McrOrderConfig {
                mcr_asn: self.mcr_asn,
                diversity_zone: &self.diversity_zone,
            },
            cost_centre: &self.cost_centre,
            promo_code: &self.promo_code,
            resource_tags: map_to_tags(&self.resource_tags),
        }]
    }
}

/// Parameters for modifying an MCR
#[derive(Debug, Clone, Default)]
pub struct ModifyMcrRequest {
    pub mcr_uid: String,
    pub name: String,
    pub cost_centre: String,
    pub marketplace_visibility: Option<bool>,
    pub contract_term_months: Option<u32>,
    pub wait: WaitOptions,
}

// =============================================================================
// Prefix filter lists
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixAction {
    Permit,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

impl AddressFamily {
    fn max_prefix_len(self) -> u8 {
        match self {
            AddressFamily::IPv4 => 32,
            AddressFamily::IPv6 => 128,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PrefixFilterEntry {
    pub action: PrefixAction,
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ge: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub le: Option<u8>,
}

/// A named list of prefix match rules attached to an MCR
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixFilterList {
    #[serde(default, skip_serializing)]
    pub id: i64,
    pub description: String,
    pub address_family: AddressFamily,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub entries: Vec<PrefixFilterEntry>,
}

impl PrefixFilterList {
    /// Check that every entry's prefix belongs to the list's address family
    /// and that `ge`/`le` bounds are consistent with the prefix length.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(Error::Validation(
                "prefix filter list description is required".to_string(),
            ));
        }
        let max = self.address_family.max_prefix_len();
        for entry in &self.entries {
            let (addr, len) = entry.prefix.split_once('/').ok_or_else(|| {
                Error::Validation(format!("prefix {} is missing a length", entry.prefix))
            })?;
            let is_v6 = addr.contains(':');
            if is_v6 != (self.address_family == AddressFamily::IPv6) {
                return Err(Error::Validation(format!(
                    "prefix {} does not match address family {:?}",
                    entry.prefix, self.address_family
                )));
            }
            let len: u8 = len.parse().map_err(|_| {
                Error::Validation(format!("invalid prefix length in {}", entry.prefix))
            })?;
            if len > max {
                return Err(Error::Validation(format!("prefix {} is too long", entry.prefix)));
            }
            let ge = entry.ge.unwrap_or(len);
            let le = entry.le.unwrap_or(max);
            if ge < len || ge > le || le > max {
                return Err(Error::Validation(format!(
                    "invalid ge/le range for prefix {}",
                    entry.prefix
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PrefixListSummary {
    id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    description: String,
    #[serde(rename = "addressFamily")]
    address_family: AddressFamily,
}

pub struct McrService {
    client: Client,
}

impl McrService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn products(&self) -> ProductService {
        self.client.products()
    }

    /// Order an MCR and return its service UID
    pub async fn buy_mcr(&self, req: BuyMcrRequest) -> Result<String> {
        req.validate()?;
        let uids = self.products().execute_order(&req.to_order()).await?;
        let uid = uids.into_iter().next().ok_or(Error::EmptyOrderResponse)?;

        if req.wait.enabled {
            let timeout = req.wait.timeout_or(DEFAULT_PROVISION_TIMEOUT);
            self.wait_for_mcr(&uid, &req.wait, timeout).await?;
        }

        Ok(uid)
    }

    pub async fn validate_mcr_order(&self, req: &BuyMcrRequest) -> Result<()> {
        req.validate()?;
        self.products().validate_product_order(&req.to_order()).await
    }

    pub async fn get_mcr(&self, mcr_uid: &str) -> Result<Mcr> {
        self.products().get_product(mcr_uid).await
    }

    pub async fn list_mcrs(&self, include_inactive: bool) -> Result<Vec<Mcr>> {
        self.products()
            .list_products_of_type(PRODUCT_MCR, include_inactive)
            .await
    }

    pub async fn modify_mcr(&self, req: ModifyMcrRequest) -> Result<Option<Mcr>> {
        self.products()
            .modify_product(&ModifyProductRequest {
                product_uid: req.mcr_uid.clone(),
                product_type: PRODUCT_MCR.to_ascii_lowercase(),
                name: req.name.clone(),
                cost_centre: req.cost_centre.clone(),
                marketplace_visibility: req.marketplace_visibility,
                contract_term_months: req.contract_term_months,
            })
            .await?;

        if !req.wait.enabled {
            return Ok(None);
        }
        let timeout = req.wait.timeout_or(DEFAULT_UPDATE_TIMEOUT);
        self.wait_for_mcr(&req.mcr_uid, &req.wait, timeout)
            .await
            .map(Some)
    }

    pub async fn delete_mcr(&self, mcr_uid: &str, delete_now: bool) -> Result<()> {
        self.products().delete_product(mcr_uid, delete_now).await
    }

    pub async fn restore_mcr(&self, mcr_uid: &str) -> Result<()> {
        self.products().restore_product(mcr_uid).await
    }

    pub async fn create_prefix_filter_list(
        &self,
        mcr_uid: &str,
        list: &PrefixFilterList,
    ) -> Result<PrefixFilterList> {
        list.validate()?;
        self.client
            .post(&format!("/v2/product/mcr2/{}/prefixList", mcr_uid), list)
            .await
    }

    /// Summaries of every prefix filter list on the MCR; entries are not included
    pub async fn list_mcr_prefix_filter_lists(
        &self,
        mcr_uid: &str,
    ) -> Result<Vec<PrefixFilterList>> {
        let summaries: Vec<PrefixListSummary> = self
            .client
            .get(&format!("/v2/product/mcr2/{}/prefixLists", mcr_uid), &[])
            .await?;
        Ok(summaries
            .into_iter()
            .map(|s| PrefixFilterList {
                id: s.id,
                description: s.description,
                address_family: s.address_family,
                entries: Vec::new(),
            })
            .collect())
    }

    pub async fn get_mcr_prefix_filter_list(
        &self,
        mcr_uid: &str,
        list_id: i64,
    ) -> Result<PrefixFilterList> {
        self.client
            .get(
                &format!("/v2/product/mcr2/{}/prefixList/{}", mcr_uid, list_id),
                &[],
            )
            .await
    }

    pub async fn modify_mcr_prefix_filter_list(
        &self,
        mcr_uid: &str,
        list_id: i64,
        list: &PrefixFilterList,
    ) -> Result<PrefixFilterList> {
        list.validate()?;
        self.client
            .put(
                &format!("/v2/product/mcr2/{}/prefixList/{}", mcr_uid, list_id),
                list,
            )
            .await
    }

    pub async fn delete_mcr_prefix_filter_list(&self, mcr_uid: &str, list_id: i64) -> Result<()> {
        self.client
            .send(
                reqwest::Method::DELETE,
                &format!("/v2/product/mcr2/{}/prefixList/{}", mcr_uid, list_id),
            )
            .await?;
        Ok(())
    }

    pub async fn list_mcr_resource_tags(&self, mcr_uid: &str) -> Result<HashMap<String, String>> {
        self.products().list_product_resource_tags(mcr_uid).await
    }

    pub async fn update_mcr_resource_tags(
        &self,
        mcr_uid: &str,
        tags: &HashMap<String, String>,
    ) -> Result<()> {
        self.products()
            .update_product_resource_tags(mcr_uid, tags)
            .await
    }

    async fn wait_for_mcr(
        &self,
        mcr_uid: &str,
        wait: &WaitOptions,
        timeout: std::time::Duration,
    ) -> Result<Mcr> {
        poll_until_ready(
            "mcr",
            mcr_uid,
            self.client.poll_interval(),
            timeout,
            wait.cancel.as_ref(),
            || self.get_mcr(mcr_uid),
        )
        .await
    }
}
