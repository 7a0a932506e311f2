//! Ports
//!
//! Physical Megaport ports and LAGs: ordering, lookup, modification,
//! cancellation, locking and VLAN availability.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::services::product::{ModifyProductRequest, ProductService};
use crate::types::{
    map_to_tags, validate_contract_term, AssociatedProduct, ResourceTag, PRODUCT_MEGAPORT,
};
use crate::wait::{
    poll_all_until_ready, poll_until_ready, Provisioned, WaitOptions, DEFAULT_PROVISION_TIMEOUT,
    DEFAULT_UPDATE_TIMEOUT,
};

/// Port speeds, in Mbps, that can be ordered
pub const VALID_PORT_SPEEDS: [u32; 3] = [1000, 10000, 100000];

/// A Megaport port
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
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
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub port_speed: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub terminate_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub market: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub location_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub usage_algorithm: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub marketplace_visibility: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "vxcpermitted")]
    pub vxc_permitted: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub vxc_auto_approval: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub secondary_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub lag_primary: bool,
    #[serde(default)]
    pub lag_id: Option<i64>,
    #[serde(default)]
    pub aggregation_id: Option<i64>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cost_centre: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub contract_start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub contract_end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub contract_term_months: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub attribute_tags: HashMap<String, String>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "virtual")]
    pub is_virtual: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub buyout_port: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub admin_locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cancelable: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub diversity_zone: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub associated_vxcs: Vec<AssociatedProduct>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub associated_ixs: Vec<AssociatedProduct>,
}

impl Provisioned for Port {
    fn provisioning_status(&self) -> &str {
        &self.provisioning_status
    }
}

/// Parameters for ordering a port
#[derive(Debug, Clone, Default)]
pub struct BuyPortRequest {
    pub name: String,
    /// Contract term in months
    pub term: u32,
    /// Speed in Mbps
    pub port_speed: u32,
    pub location_id: i64,
    pub market: String,
    /// Number of ports in a LAG; zero orders a single port
    pub lag_count: u32,
    pub marketplace_visibility: bool,
    pub diversity_zone: String,
    pub cost_centre: String,
    pub promo_code: String,
    pub resource_tags: HashMap<String, String>,
    pub wait: WaitOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PortOrder<'a> {
    name: &'a str,
    term: u32,
    product_type: &'static str,
    port_speed: u32,
    location_id: i64,
    #[serde(rename = "virtual")]
    is_virtual: bool,
    market: &'a str,
    marketplace_visibility: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    lag_port_count: Option<u32>,
    #[serde(skip_serializing_if = "str::is_empty")]
    cost_centre: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    promo_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PortOrderConfig<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource_tags: Vec<ResourceTag>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PortOrderConfig<'a> {
    diversity_zone: &'a str,
}

impl BuyPortRequest {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("port name is required".to_string()));
        }
        validate_contract_term(self.term)?;
        if !VALID_PORT_SPEEDS.contains(&self.port_speed) {
            return Err(Error::InvalidPortSpeed(self.port_speed));
        }
        Ok(())
    }

    fn to_order(&self) -> Vec<PortOrder<'_>> {
        vec![PortOrder {
            name: &self.name,
            term: self.term,
            product_type: PRODUCT_MEGAPORT,
            port_speed: self.port_speed,
            location_id: self.location_id,
            is_virtual: false,
            market: &self.market,
            marketplace_visibility: self.marketplace_visibility,
            lag_port_count: (self.lag_count > 0).then_some(self.lag_count),
            cost_centre: &self.cost_centre,
            promo_code: &self.promo_code,
            config: (!self.diversity_zone.is_empty()).then(|| PortOrderConfig {
                diversity_zone: &self.diversity_zone,
            }),
            resource_tags: map_to_tags(&self.resource_tags),
        }]
    }
}

/// Parameters for modifying a port
#[derive(Debug, Clone, Default)]
pub struct ModifyPortRequest {
    pub port_uid: String,
    pub name: String,
    pub marketplace_visibility: Option<bool>,
    pub cost_centre: String,
    pub contract_term_months: Option<u32>,
    pub wait: WaitOptions,
}

pub struct PortService {
    client: Client,
}

impl PortService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn products(&self) -> ProductService {
        self.client.products()
    }

    /// Order a port (or LAG) and return the new service UIDs.
    ///
    /// With `wait` enabled, returns only after every ordered port is ready.
    /// A LAG shares a single timeout across all of its ports.
    pub async fn buy_port(&self, req: BuyPortRequest) -> Result<Vec<String>> {
        req.validate()?;
        let uids = self.products().execute_order(&req.to_order()).await?;

        if req.wait.enabled {
            poll_all_until_ready(
                "port",
                &uids,
                self.client.poll_interval(),
                req.wait.timeout_or(DEFAULT_PROVISION_TIMEOUT),
                req.wait.cancel.as_ref(),
                |uid| async move { self.get_port(&uid).await },
            )
            .await?;
        }

        Ok(uids)
    }

    pub async fn validate_port_order(&self, req: &BuyPortRequest) -> Result<()> {
        req.validate()?;
        self.products().validate_product_order(&req.to_order()).await
    }

    pub async fn list_ports(&self, include_inactive: bool) -> Result<Vec<Port>> {
        self.products()
            .list_products_of_type(PRODUCT_MEGAPORT, include_inactive)
            .await
    }

    pub async fn get_port(&self, port_uid: &str) -> Result<Port> {
        self.products().get_product(port_uid).await
    }

    /// Rename or re-bill a port, optionally waiting for it to settle
    pub async fn modify_port(&self, req: ModifyPortRequest) -> Result<Option<Port>> {
        self.products()
            .modify_product(&ModifyProductRequest {
                product_uid: req.port_uid.clone(),
                product_type: PRODUCT_MEGAPORT.to_ascii_lowercase(),
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
        self.wait_for_port(&req.port_uid, &req.wait, timeout)
            .await
            .map(Some)
    }

    pub async fn delete_port(&self, port_uid: &str, delete_now: bool) -> Result<()> {
        self.products().delete_product(port_uid, delete_now).await
    }

    pub async fn restore_port(&self, port_uid: &str) -> Result<()> {
        self.products().restore_product(port_uid).await
    }

    pub async fn lock_port(&self, port_uid: &str) -> Result<()> {
        let port = self.get_port(port_uid).await?;
        if port.locked {
            return Err(Error::PortAlreadyLocked(port_uid.to_string()));
        }
        self.products().manage_product_lock(port_uid, true).await
    }

    pub async fn unlock_port(&self, port_uid: &str) -> Result<()> {
        let port = self.get_port(port_uid).await?;
        if !port.locked {
            return Err(Error::PortNotLocked(port_uid.to_string()));
        }
        self.products().manage_product_lock(port_uid, false).await
    }

    /// Whether `vlan` is still free on the port
    pub async fn check_port_vlan_availability(&self, port_uid: &str, vlan: i32) -> Result<bool> {
        let available: Vec<i32> = self
            .client
            .get(
                &format!("/v2/product/port/{}/vlan", port_uid),
                &[("vlan", vlan.to_string())],
            )
            .await?;
        Ok(available.contains(&vlan))
    }

    pub async fn list_port_resource_tags(&self, port_uid: &str) -> Result<HashMap<String, String>> {
        self.products().list_product_resource_tags(port_uid).await
    }

    pub async fn update_port_resource_tags(
        &self,
        port_uid: &str,
        tags: &HashMap<String, String>,
    ) -> Result<()> {
        self.products()
            .update_product_resource_tags(port_uid, tags)
            .await
    }

    async fn wait_for_port(
        &self,
        port_uid: &str,
        wait: &WaitOptions,
        timeout: std::time::Duration,
    ) -> Result<Port> {
        poll_until_ready(
            "port",
            port_uid,
            self.client.poll_interval(),
            timeout,
            wait.cancel.as_ref(),
            || self.get_port(port_uid),
        )
        .await
    }
}
