//! Partner (cloud provider) ports
//!
//! Listing plus a set of filters that narrow the marketplace down to the port
//! a VXC should land on. Every filter fails with
//! [`Error::NoPartnerPortsFound`] rather than returning an empty list.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::fuzzy;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerMegaport {
    /// e.g. `AWS`, `AZURE`, `GOOGLE`, `TRANSIT`
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub connect_type: String,
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "title")]
    pub product_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub diversity_zone: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub location_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub speed: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub rank: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default", rename = "vxcPermitted")]
    pub vxc_permitted: bool,
}

fn non_empty(ports: Vec<PartnerMegaport>) -> Result<Vec<PartnerMegaport>> {
    if ports.is_empty() {
        Err(Error::NoPartnerPortsFound)
    } else {
        Ok(ports)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub struct PartnerService {
    client: Client,
}

impl PartnerService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_partner_megaports(&self) -> Result<Vec<PartnerMegaport>> {
        let ports: Vec<PartnerMegaport> = self
            .client
            .get("/v2/dropdowns/partner/megaports", &[])
            .await?;
        tracing::debug!(count = ports.len(), "Listed partner ports");
        Ok(ports)
    }

    /// Exact name equality, or a fuzzy match ranked closest first
    pub fn filter_partner_megaport_by_product_name(
        &self,
        ports: Vec<PartnerMegaport>,
        name: &str,
        exact: bool,
    ) -> Result<Vec<PartnerMegaport>> {
        let filtered = if exact {
            ports.into_iter().filter(|p| p.product_name == name).collect()
        } else {
            fuzzy::rank(name, &ports, |p| p.product_name.as_str())
                .into_iter()
                .cloned()
                .collect()
        };
        non_empty(filtered)
    }

    pub fn filter_partner_megaport_by_connect_type(
        &self,
        ports: Vec<PartnerMegaport>,
        connect_type: &str,
        exact: bool,
    ) -> Result<Vec<PartnerMegaport>> {
        non_empty(
            ports
                .into_iter()
                .filter(|p| {
                    if exact {
                        p.connect_type == connect_type
                    } else {
                        contains_ignore_case(&p.connect_type, connect_type)
                    }
                })
                .collect(),
        )
    }

    pub fn filter_partner_megaport_by_company_name(
        &self,
        ports: Vec<PartnerMegaport>,
        company_name: &str,
        exact: bool,
    ) -> Result<Vec<PartnerMegaport>> {
        let filtered = if exact {
            ports
                .into_iter()
                .filter(|p| p.company_name == company_name)
                .collect()
        } else {
            fuzzy::rank(company_name, &ports, |p| p.company_name.as_str())
                .into_iter()
                .cloned()
                .collect()
        };
        non_empty(filtered)
    }

    pub fn filter_partner_megaport_by_location_id(
        &self,
        ports: Vec<PartnerMegaport>,
        location_id: i64,
    ) -> Result<Vec<PartnerMegaport>> {
        non_empty(
            ports
                .into_iter()
                .filter(|p| p.location_id == location_id)
                .collect(),
        )
    }

    pub fn filter_partner_megaport_by_diversity_zone(
        &self,
        ports: Vec<PartnerMegaport>,
        zone: &str,
        exact: bool,
    ) -> Result<Vec<PartnerMegaport>> {
        non_empty(
            ports
                .into_iter()
                .filter(|p| {
                    if exact {
                        p.diversity_zone == zone
                    } else {
                        contains_ignore_case(&p.diversity_zone, zone)
                    }
                })
                .collect(),
        )
    }
}
