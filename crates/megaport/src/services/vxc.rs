//! Virtual Cross Connects (VXC)
//!
//! Point-to-point circuits between two endpoints on the fabric. The b-end may
//! be a cloud partner port, in which case a [`PartnerConfig`] carries the
//! cloud-specific peering details.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::services::product::ProductService;
use crate::types::{map_to_tags, validate_contract_term, validate_vlan, ResourceTag};
use crate::wait::{
    poll_until_ready, Provisioned, WaitOptions, DEFAULT_PROVISION_TIMEOUT, DEFAULT_UPDATE_TIMEOUT,
};

/// A virtual cross connect
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vxc {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_id: i64,
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub service_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_type: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub rate_limit: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub distance_band: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub provisioning_status: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub a_end: VxcEnd,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub b_end: VxcEnd,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub secondary_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub usage_algorithm: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub created_by: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub contract_term_months: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub contract_start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub contract_end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub admin_locked: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub attribute_tags: HashMap<String, String>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cancelable: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub cost_centre: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub shutdown: bool,
    #[serde(default)]
    pub vxc_approval: Option<VxcApproval>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub resources: VxcResources,
}

impl Provisioned for Vxc {
    fn provisioning_status(&self) -> &str {
        &self.provisioning_status
    }
}

/// One side of a VXC as reported by the API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcEnd {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub owner_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub location_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub location: String,
    #[serde(default)]
    pub vlan: Option<i32>,
    #[serde(default)]
    pub inner_vlan: Option<i32>,
    #[serde(default, rename = "vNicIndex")]
    pub vnic_index: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub secondary_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcApproval {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub new_speed: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VxcResources {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub interface: Vec<serde_json::Value>,
    #[serde(default)]
    pub virtual_router: Option<serde_json::Value>,
    #[serde(default)]
    pub csp_connection: Option<serde_json::Value>,
    #[serde(default)]
    pub vll: Option<Vll>,
}

/// Layer 2 resource details; this object uses snake_case keys
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Vll {
    #[serde(default)]
    pub a_vlan: Option<i32>,
    #[serde(default)]
    pub b_vlan: Option<i32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub rate_limit_mbps: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub resource_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub resource_type: String,
    #[serde(default)]
    pub up: Option<i32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub shutdown: bool,
}

// =============================================================================
// Partner configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsConfig {
    /// `private` or `public` virtual interface
    #[serde(rename = "type")]
    pub kind: String,
    pub owner_account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_asn: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub auth_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub prefixes: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub customer_ip_address: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub amazon_ip_address: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "name", skip_serializing_if = "String::is_empty")]
    pub connection_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePeering {
    /// `private` or `microsoft`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "peerASN", skip_serializing_if = "String::is_empty")]
    pub peer_asn: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub primary_subnet: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub secondary_subnet: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub prefixes: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub shared_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureConfig {
    pub service_key: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<AzurePeering>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleConfig {
    pub pairing_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleConfig {
    pub virtual_circuit_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IbmConfig {
    pub account_id: String,
    #[serde(default, rename = "customerASN", skip_serializing_if = "Option::is_none")]
    pub customer_asn: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub customer_ip_address: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub provider_ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRoute {
    pub prefix: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub next_hop: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BfdConfig {
    pub tx_interval: u32,
    pub rx_interval: u32,
    pub multiplier: u32,
}

impl Default for BfdConfig {
    fn default() -> Self {
        Self {
            tx_interval: 300,
            rx_interval: 300,
            multiplier: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BgpConnection {
    pub peer_asn: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_asn: Option<u32>,
    pub local_ip_address: String,
    pub peer_ip_address: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub shutdown: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_in: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_out: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub bfd_enabled: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub export_policy: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub permit_export_to: Vec<String>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub deny_export_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_whitelist: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_blacklist: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_whitelist: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_blacklist: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_path_prepend_count: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "String::is_empty")]
    pub peer_type: String,
}

/// A routed interface on the MCR side of a VXC
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInterface {
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub ip_routes: Vec<IpRoute>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub nat_ip_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bfd: Option<BfdConfig>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub bgp_connections: Vec<BgpConnection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VRouterConfig {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub interfaces: Vec<PartnerInterface>,
}

/// Cloud or router specific settings for one end of a VXC
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "connectType")]
pub enum PartnerConfig {
    #[serde(rename = "AWS")]
    Aws(AwsConfig),
    /// AWS hosted connection
    #[serde(rename = "AWSHC")]
    AwsHosted(AwsConfig),
    #[serde(rename = "AZURE")]
    Azure(AzureConfig),
    #[serde(rename = "GOOGLE")]
    Google(GoogleConfig),
    #[serde(rename = "ORACLE")]
    Oracle(OracleConfig),
    #[serde(rename = "IBM")]
    Ibm(IbmConfig),
    #[serde(rename = "TRANSIT")]
    Transit,
    #[serde(rename = "VROUTER")]
    VRouter(VRouterConfig),
}

impl PartnerConfig {
    pub fn connect_type(&self) -> &'static str {
        match self {
            PartnerConfig::Aws(_) => "AWS",
            PartnerConfig::AwsHosted(_) => "AWSHC",
            PartnerConfig::Azure(_) => "AZURE",
            PartnerConfig::Google(_) => "GOOGLE",
            PartnerConfig::Oracle(_) => "ORACLE",
            PartnerConfig::Ibm(_) => "IBM",
            PartnerConfig::Transit => "TRANSIT",
            PartnerConfig::VRouter(_) => "VROUTER",
        }
    }
}

// =============================================================================
// Ordering
// =============================================================================

/// One end of a VXC being ordered
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcOrderEndpoint {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_uid: String,
    pub vlan: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_vlan: Option<i32>,
    #[serde(rename = "vNicIndex", skip_serializing_if = "Option::is_none")]
    pub vnic_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_config: Option<PartnerConfig>,
}

impl VxcOrderEndpoint {
    fn validate(&self) -> Result<()> {
        validate_vlan(self.vlan)?;
        if let Some(inner) = self.inner_vlan {
            validate_vlan(inner)?;
        }
        Ok(())
    }
}

/// Parameters for ordering a VXC
#[derive(Debug, Clone, Default)]
pub struct BuyVxcRequest {
    /// Product the VXC is ordered from (port, MCR or MVE)
    pub port_uid: String,
    pub vxc_name: String,
    /// Speed in Mbps
    pub rate_limit: u32,
    pub term: u32,
    pub shutdown: bool,
    pub promo_code: String,
    pub service_key: String,
    pub cost_centre: String,
    pub a_end: VxcOrderEndpoint,
    pub b_end: VxcOrderEndpoint,
    pub resource_tags: HashMap<String, String>,
    pub wait: WaitOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VxcOrder<'a> {
    product_uid: &'a str,
    associated_vxcs: Vec<VxcOrderDetails<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VxcOrderDetails<'a> {
    product_name: &'a str,
    rate_limit: u32,
    term: u32,
    shutdown: bool,
    #[serde(skip_serializing_if = "str::is_empty")]
    promo_code: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    service_key: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    cost_centre: &'a str,
    a_end: &'a VxcOrderEndpoint,
    b_end: &'a VxcOrderEndpoint,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource_tags: Vec<ResourceTag>,
}

impl BuyVxcRequest {
    fn validate(&self) -> Result<()> {
        if self.port_uid.is_empty() {
            return Err(Error::Validation("a-end product UID is required".to_string()));
        }
        if self.vxc_name.trim().is_empty() {
            return Err(Error::Validation("VXC name is required".to_string()));
        }
        validate_contract_term(self.term)?;
        if let Some(cfg) = &self.a_end.partner_config {
            if !matches!(cfg, PartnerConfig::VRouter(_)) {
                return Err(Error::InvalidVxcAEndPartnerConfig);
            }
        }
        self.a_end.validate()?;
        self.b_end.validate()
    }

    fn to_order(&self) -> Vec<VxcOrder<'_>> {
        vec![VxcOrder {
            product_uid: &self.port_uid,
            associated_vxcs: vec![VxcOrderDetails {
                product_name: &self.vxc_name,
                rate_limit: self.rate_limit,
                term: self.term,
                shutdown: self.shutdown,
                promo_code: &self.promo_code,
                service_key: &self.service_key,
                cost_centre: &self.cost_centre,
                a_end: &self.a_end,
                b_end: &self.b_end,
                resource_tags: map_to_tags(&self.resource_tags),
            }],
        }]
    }
}

/// Changes to apply to an existing VXC; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVxcRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end_vlan: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_vlan: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end_inner_vlan: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_inner_vlan: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end_product_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_product_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end_partner_config: Option<PartnerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_partner_config: Option<PartnerConfig>,
    #[serde(skip)]
    pub wait: WaitOptions,
}

impl UpdateVxcRequest {
    fn validate(&self) -> Result<()> {
        if let Some(term) = self.term {
            validate_contract_term(term)?;
        }
        for vlan in [
            self.a_end_vlan,
            self.b_end_vlan,
            self.a_end_inner_vlan,
            self.b_end_inner_vlan,
        ]
        .into_iter()
        .flatten()
        {
            validate_vlan(vlan)?;
        }
        if let Some(cfg) = &self.a_end_partner_config {
            if !matches!(cfg, PartnerConfig::VRouter(_)) {
                return Err(Error::InvalidVxcAEndPartnerConfig);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Partner port lookup
// =============================================================================

/// Cloud partners whose ports are found through a pairing or service key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurePartner {
    Azure,
    Google,
    Oracle,
}

impl SecurePartner {
    fn as_path(self) -> &'static str {
        match self {
            SecurePartner::Azure => "azure",
            SecurePartner::Google => "google",
            SecurePartner::Oracle => "oracle",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupPartnerPortsRequest {
    /// Service or pairing key issued by the cloud provider
    pub key: String,
    pub port_speed: u32,
    pub partner: SecurePartner,
    /// Only accept this partner port
    pub product_uid: Option<String>,
}

/// A candidate partner port returned by a key lookup
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLookupItem {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub port: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "type")]
    pub kind: String,
    /// Set when the port is already in use by a VXC
    #[serde(default)]
    pub vxc: Option<i64>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub location_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub diversity_zone: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLookup {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub bandwidth: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub bandwidths: Vec<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub megaports: Vec<PartnerLookupItem>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub peers: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "resource_type")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "service_key")]
    pub service_key: String,
    #[serde(default)]
    pub vlan: Option<i32>,
}

impl PartnerLookup {
    /// First unused port matching the request
    fn select(self, req: &LookupPartnerPortsRequest) -> Result<PartnerLookupItem> {
        if !self.bandwidths.is_empty() && !self.bandwidths.contains(&req.port_speed) {
            return Err(Error::NoAvailablePartnerPort(req.port_speed));
        }
        self.megaports
            .into_iter()
            .filter(|p| p.vxc.is_none())
            .find(|p| {
                req.product_uid
                    .as_deref()
                    .map_or(true, |uid| p.product_uid == uid)
            })
            .ok_or(Error::NoAvailablePartnerPort(req.port_speed))
    }
}

pub struct VxcService {
    client: Client,
}

impl VxcService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    fn products(&self) -> ProductService {
        self.client.products()
    }

    /// Order a VXC and return its service UID
    pub async fn buy_vxc(&self, req: BuyVxcRequest) -> Result<String> {
        req.validate()?;
        let uids = self.products().execute_order(&req.to_order()).await?;
        let uid = uids.into_iter().next().ok_or(Error::EmptyOrderResponse)?;

        if req.wait.enabled {
            let timeout = req.wait.timeout_or(DEFAULT_PROVISION_TIMEOUT);
            self.wait_for_vxc(&uid, &req.wait, timeout).await?;
        }

        Ok(uid)
    }

    pub async fn validate_vxc_order(&self, req: &BuyVxcRequest) -> Result<()> {
        req.validate()?;
        self.products().validate_product_order(&req.to_order()).await
    }

    pub async fn get_vxc(&self, vxc_uid: &str) -> Result<Vxc> {
        self.products().get_product(vxc_uid).await
    }

    pub async fn delete_vxc(&self, vxc_uid: &str, delete_now: bool) -> Result<()> {
        self.products().delete_product(vxc_uid, delete_now).await
    }

    /// Apply changes to a VXC, optionally waiting for it to settle
    pub async fn update_vxc(&self, vxc_uid: &str, req: UpdateVxcRequest) -> Result<Option<Vxc>> {
        req.validate()?;
        let _: Option<serde_json::Value> = self
            .client
            .put(&format!("/v3/product/vxc/{}", vxc_uid), &req)
            .await?;
        tracing::info!(vxc_uid, "VXC update submitted");

        if !req.wait.enabled {
            return Ok(None);
        }
        let timeout = req.wait.timeout_or(DEFAULT_UPDATE_TIMEOUT);
        self.wait_for_vxc(vxc_uid, &req.wait, timeout).await.map(Some)
    }

    /// Find a free partner port for a cloud key
    pub async fn lookup_partner_ports(
        &self,
        req: &LookupPartnerPortsRequest,
    ) -> Result<PartnerLookupItem> {
        let lookup: PartnerLookup = self
            .client
            .get_segments(&["v2", "secure", req.partner.as_path(), req.key.as_str()])
            .await?;
        lookup.select(req)
    }

    pub async fn list_vxc_resource_tags(&self, vxc_uid: &str) -> Result<HashMap<String, String>> {
        self.products().list_product_resource_tags(vxc_uid).await
    }

    pub async fn update_vxc_resource_tags(
        &self,
        vxc_uid: &str,
        tags: &HashMap<String, String>,
    ) -> Result<()> {
        self.products()
            .update_product_resource_tags(vxc_uid, tags)
            .await
    }

    async fn wait_for_vxc(
        &self,
        vxc_uid: &str,
        wait: &WaitOptions,
        timeout: std::time::Duration,
    ) -> Result<Vxc> {
        poll_until_ready(
            "vxc",
            vxc_uid,
            self.client.poll_interval(),
            timeout,
            wait.cancel.as_ref(),
            || self.get_vxc(vxc_uid),
        )
        .await
    }
}
