//! Megaport Virtual Edge (MVE)
//!
//! Vendor network appliances (SD-WAN, firewalls) hosted on the Megaport
//! fabric. Each vendor needs its own bootstrap settings, carried in
//! [`VendorConfig`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::services::product::{ModifyProductRequest, ProductService};
use crate::types::{
    map_to_tags, validate_contract_term, AssociatedProduct, ResourceTag, PRODUCT_MVE,
};
use crate::wait::{
    poll_until_ready, Provisioned, WaitOptions, DEFAULT_PROVISION_TIMEOUT, DEFAULT_UPDATE_TIMEOUT,
};

/// A Megaport Virtual Edge
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mve {
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
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub admin_locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cancelable: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub diversity_zone: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub vendor: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mve_size: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "vnics")]
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub associated_vxcs: Vec<AssociatedProduct>,
}

impl Provisioned for Mve {
    fn provisioning_status(&self) -> &str {
        &self.provisioning_status
    }
}

/// A virtual NIC on an MVE
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkInterface {
    pub description: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub vlan: i32,
}

/// Image and size selection common to every vendor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSelection {
    pub image_id: i64,
    /// One of the sizes returned by [`MveService::list_available_mve_sizes`]
    pub product_size: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub mve_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArubaConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub account_name: String,
    pub account_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub system_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AviatrixConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub cloud_init: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiscoConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub manage_locally: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub admin_ssh_public_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub ssh_public_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub cloud_init: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub fmc_ip_address: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub fmc_registration_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub fmc_nat_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortinetConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub admin_ssh_public_key: String,
    pub ssh_public_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub license_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaloAltoConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub admin_ssh_public_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub ssh_public_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub admin_password_hash: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub license_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrismaConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub ion_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersaConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub director_address: String,
    pub controller_address: String,
    pub local_auth: String,
    pub remote_auth: String,
    pub serial_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmwareConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub admin_ssh_public_key: String,
    pub ssh_public_key: String,
    pub vco_address: String,
    pub vco_activation_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerakiConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SixWindConfig {
    #[serde(flatten)]
    pub image: ImageSelection,
    pub ssh_public_key: String,
}

/// Vendor bootstrap settings, tagged on the wire by `vendor`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "vendor")]
pub enum VendorConfig {
    #[serde(rename = "aruba")]
    Aruba(ArubaConfig),
    #[serde(rename = "aviatrix")]
    Aviatrix(AviatrixConfig),
    #[serde(rename = "cisco")]
    Cisco(CiscoConfig),
    #[serde(rename = "fortinet")]
    Fortinet(FortinetConfig),
    #[serde(rename = "palo_alto")]
    PaloAlto(PaloAltoConfig),
    #[serde(rename = "prisma")]
    Prisma(PrismaConfig),
    #[serde(rename = "versa")]
    Versa(VersaConfig),
    #[serde(rename = "vmware")]
    Vmware(VmwareConfig),
    #[serde(rename = "meraki")]
    Meraki(MerakiConfig),
    #[serde(rename = "6wind")]
    SixWind(SixWindConfig),
}

impl VendorConfig {
    pub fn image(&self) -> &ImageSelection {
        match self {
            VendorConfig::Aruba(c) => &c.image,
            VendorConfig::Aviatrix(c) => &c.image,
            VendorConfig::Cisco(c) => &c.image,
            VendorConfig::Fortinet(c) => &c.image,
            VendorConfig::PaloAlto(c) => &c.image,
            VendorConfig::Prisma(c) => &c.image,
            VendorConfig::Versa(c) => &c.image,
            VendorConfig::Vmware(c) => &c.image,
            VendorConfig::Meraki(c) => &c.image,
            VendorConfig::SixWind(c) => &c.image,
        }
    }
}

/// Parameters for ordering an MVE
#[derive(Debug, Clone)]
pub struct BuyMveRequest {
    pub name: String,
    pub term: u32,
    pub location_id: i64,
    pub vendor_config: VendorConfig,
    pub vnics: Vec<NetworkInterface>,
    pub diversity_zone: String,
    pub cost_centre: String,
    pub promo_code: String,
    pub resource_tags: HashMap<String, String>,
    pub wait: WaitOptions,
}

impl BuyMveRequest {
    pub fn new(
        name: impl Into<String>,
        term: u32,
        location_id: i64,
        vendor_config: VendorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            term,
            location_id,
            vendor_config,
            vnics: Vec::new(),
            diversity_zone: String::new(),
            cost_centre: String::new(),
            promo_code: String::new(),
            resource_tags: HashMap::new(),
            wait: WaitOptions::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("MVE name is required".to_string()));
        }
        validate_contract_term(self.term)?;
        if self.vendor_config.image().product_size.is_empty() {
            return Err(Error::Validation("MVE product size is required".to_string()));
        }
        Ok(())
    }

    fn to_order(&self) -> Vec<MveOrder<'_>> {
        // The API needs at least one vNIC
        let vnics = if self.vnics.is_empty() {
            vec![NetworkInterface {
                description: "Data Plane".to_string(),
                vlan: 0,
            }]
        } else {
            self.vnics.clone()
        };

        vec![MveOrder {
            location_id: self.location_id,
            product_name: &self.name,
            term: self.term,
            product_type: PRODUCT_MVE,
            vendor_config: &self.vendor_config,
            vnics,
            cost_centre: &self.cost_centre,
            promo_code: &self.promo_code,
            config: (!self.diversity_zone.is_empty()).then(|| MveOrderConfig {
                diversity_zone: &self.diversity_zone,
            }),
            resource_tags: map_to_tags(&self.resource_tags),
        }]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MveOrder<'a> {
    location_id: i64,
    product_name: &'a str,
    term: u32,
    product_type: &'static str,
    vendor_config: &'a VendorConfig,
    vnics: Vec<NetworkInterface>,
    #[serde(skip_serializing_if = "str::is_empty")]
    cost_centre: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    promo_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<MveOrderConfig<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource_tags: Vec<ResourceTag>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MveOrderConfig<'a> {
    diversity_zone: &'a str,
}

/// Parameters for modifying an MVE
#[derive(Debug, Clone, Default)]
pub struct ModifyMveRequest {
    pub mve_uid: String,
    pub name: String,
    pub cost_centre: String,
    pub contract_term_months: Option<u32>,
    pub wait: WaitOptions,
}

/// An installable appliance image
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MveImage {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub vendor: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub vendor_description: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub release_image: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_code: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub available_sizes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MveImagesData {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    mve_images: Vec<MveImage>,
}

/// A hardware profile an MVE can be ordered with
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MveSize {
    pub size: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cpu_core_count: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "ramGB")]
    pub ram_gb: u32,
}

/// Criteria for [`filter_mve_images`]; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    pub vendor: Option<String>,
    pub product_code: Option<String>,
    pub version: Option<String>,
    pub release_image: Option<bool>,
}

pub fn filter_mve_images(images: &[MveImage], filter: &ImageFilter) -> Vec<MveImage> {
    images
        .iter()
        .filter(|img| {
            filter
                .vendor
                .as_deref()
                .map_or(true, |v| img.vendor.eq_ignore_ascii_case(v))
                && filter
                    .product_code
                    .as_deref()
                    .map_or(true, |c| img.product_code.eq_ignore_ascii_case(c))
                && filter.version.as_deref().map_or(true, |v| img.version == v)
                && filter.release_image.map_or(true, |r| img.release_image == r)
        })
        .cloned()
        .collect()
}

pub struct MveService {
    client: Client,
}

impl MveService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn products(&self) -> ProductService {
        self.client.products()
    }

    /// Order an MVE and return its service UID
    pub async fn buy_mve(&self, req: BuyMveRequest) -> Result<String> {
        req.validate()?;
        let uids = self.products().execute_order(&req.to_order()).await?;
        let uid = uids.into_iter().next().ok_or(Error::EmptyOrderResponse)?;

        if req.wait.enabled {
            let timeout = req.wait.timeout_or(DEFAULT_PROVISION_TIMEOUT);
            self.wait_for_mve(&uid, &req.wait, timeout).await?;
        }

        Ok(uid)
    }

    pub async fn validate_mve_order(&self, req: &BuyMveRequest) -> Result<()> {
        req.validate()?;
        self.products().validate_product_order(&req.to_order()).await
    }

    pub async fn get_mve(&self, mve_uid: &str) -> Result<Mve> {
        self.products().get_product(mve_uid).await
    }

    pub async fn list_mves(&self, include_inactive: bool) -> Result<Vec<Mve>> {
        self.products()
            .list_products_of_type(PRODUCT_MVE, include_inactive)
            .await
    }

    pub async fn modify_mve(&self, req: ModifyMveRequest) -> Result<Option<Mve>> {
        self.products()
            .modify_product(&ModifyProductRequest {
                product_uid: req.mve_uid.clone(),
                product_type: PRODUCT_MVE.to_ascii_lowercase(),
                name: req.name.clone(),
                cost_centre: req.cost_centre.clone(),
                marketplace_visibility: None,
                contract_term_months: req.contract_term_months,
            })
            .await?;

        if !req.wait.enabled {
            return Ok(None);
        }
        let timeout = req.wait.timeout_or(DEFAULT_UPDATE_TIMEOUT);
        self.wait_for_mve(&req.mve_uid, &req.wait, timeout)
            .await
            .map(Some)
    }

    pub async fn delete_mve(&self, mve_uid: &str) -> Result<()> {
        self.products().delete_product(mve_uid, true).await
    }

    pub async fn list_mve_images(&self) -> Result<Vec<MveImage>> {
        let data: MveImagesData = self.client.get("/v4/product/mve/images", &[]).await?;
        Ok(data.mve_images)
    }

    pub async fn list_available_mve_sizes(&self) -> Result<Vec<MveSize>> {
        self.client.get("/v4/product/mve/variants", &[]).await
    }

    pub async fn list_mve_resource_tags(&self, mve_uid: &str) -> Result<HashMap<String, String>> {
        self.products().list_product_resource_tags(mve_uid).await
    }

    pub async fn update_mve_resource_tags(
        &self,
        mve_uid: &str,
        tags: &HashMap<String, String>,
    ) -> Result<()> {
        self.products()
            .update_product_resource_tags(mve_uid, tags)
            .await
    }

    async fn wait_for_mve(
        &self,
        mve_uid: &str,
        wait: &WaitOptions,
        timeout: std::time::Duration,
    ) -> Result<Mve> {
        poll_until_ready(
            "mve",
            mve_uid,
            self.client.poll_interval(),
            timeout,
            wait.cancel.as_ref(),
            || self.get_mve(mve_uid),
        )
        .await
    }
}
