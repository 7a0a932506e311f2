//! Data centre locations and market codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::fuzzy;

/// A location from the v2 listing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub country: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub live_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub site_code: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub network_region: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub address: LocationAddress,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub campus: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub products: LocationProducts,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub market: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub metro: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub v_router_available: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocationAddress {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub street: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub suburb: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub postcode: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub country: String,
}

/// Products orderable at a location. Speeds are in Mbps.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProducts {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mcr: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mcr_version: u32,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub megaport: Vec<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mve: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mcr1: Vec<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mcr2: Vec<u32>,
}

/// A location from the v3 listing, with per-zone capabilities
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationV3 {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub address: LocationAddress,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub market: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub metro: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub site_code: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub diversity_zones: DiversityZones,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiversityZones {
    #[serde(default)]
    pub red: Option<DiversityZone>,
    #[serde(default)]
    pub blue: Option<DiversityZone>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversityZone {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mcr_speed_mbps: Vec<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub megaport_speed_mbps: Vec<u32>,
    #[serde(default)]
    pub mve_max_cpu_core_count: Option<u32>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mve_available: bool,
}

impl LocationV3 {
    /// Capabilities of a named zone (`red` or `blue`)
    pub fn diversity_zone(&self, name: &str) -> Option<&DiversityZone> {
        match name.to_ascii_lowercase().as_str() {
            "red" => self.diversity_zones.red.as_ref(),
            "blue" => self.diversity_zones.blue.as_ref(),
            _ => None,
        }
    }

    fn zones(&self) -> impl Iterator<Item = &DiversityZone> {
        self.diversity_zones
            .red
            .iter()
            .chain(self.diversity_zones.blue.iter())
    }

    pub fn supports_mcr(&self) -> bool {
        self.zones().any(|z| !z.mcr_speed_mbps.is_empty())
    }

    pub fn supports_mve(&self) -> bool {
        self.zones().any(|z| z.mve_available)
    }

    /// MCR speeds offered in any zone, sorted and deduplicated
    pub fn mcr_speeds(&self) -> Vec<u32> {
        let mut speeds: Vec<u32> = self
            .zones()
            .flat_map(|z| z.mcr_speed_mbps.iter().copied())
            .collect();
        speeds.sort_unstable();
        speeds.dedup();
        speeds
    }

    /// Port speeds offered in any zone, sorted and deduplicated
    pub fn megaport_speeds(&self) -> Vec<u32> {
        let mut speeds: Vec<u32> = self
            .zones()
            .flat_map(|z| z.megaport_speed_mbps.iter().copied())
            .collect();
        speeds.sort_unstable();
        speeds.dedup();
        speeds
    }

    pub fn supports_port_speed_in_zone(&self, zone: &str, speed: u32) -> bool {
        self.diversity_zone(zone)
            .is_some_and(|z| z.megaport_speed_mbps.contains(&speed))
    }
}

/// A country within a network region
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    /// Market code, e.g. `AU`
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub prefix: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub site_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRegion {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub countries: Vec<Country>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub network_region: String,
}

/// Locations that do (or do not) offer MCR
pub fn filter_locations_by_mcr_availability(
    mcr_available: bool,
    locations: Vec<Location>,
) -> Vec<Location> {
    locations
        .into_iter()
        .filter(|l| l.products.mcr == mcr_available)
        .collect()
}

pub struct LocationService {
    client: Client,
}

impl LocationService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        self.client.get("/v2/locations", &[]).await
    }

    pub async fn list_locations_v3(&self) -> Result<Vec<LocationV3>> {
        self.client.get("/v3/locations", &[]).await
    }

    pub async fn get_location_by_id(&self, location_id: i64) -> Result<Location> {
        self.list_locations()
            .await?
            .into_iter()
            .find(|l| l.id == location_id)
            .ok_or_else(|| Error::LocationNotFound(location_id.to_string()))
    }

    pub async fn get_location_by_id_v3(&self, location_id: i64) -> Result<LocationV3> {
        self.list_locations_v3()
            .await?
            .into_iter()
            .find(|l| l.id == location_id)
            .ok_or_else(|| Error::LocationNotFound(location_id.to_string()))
    }

    /// Exact name lookup
    pub async fn get_location_by_name(&self, name: &str) -> Result<Location> {
        self.list_locations()
            .await?
            .into_iter()
            .find(|l| l.name == name)
            .ok_or_else(|| Error::LocationNotFound(name.to_string()))
    }

    /// Locations whose names fuzzily match `search`, closest first
    pub async fn get_location_by_name_fuzzy(&self, search: &str) -> Result<Vec<Location>> {
        let locations = self.list_locations().await?;
        let matches: Vec<Location> = fuzzy::rank(search, &locations, |l| l.name.as_str())
            .into_iter()
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(Error::NoMatchingLocations(search.to_string()));
        }
        tracing::debug!(search, matches = matches.len(), "Fuzzy location lookup");
        Ok(matches)
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        let regions: Vec<NetworkRegion> = self.client.get("/v2/networkRegions", &[]).await?;
        Ok(regions.into_iter().flat_map(|r| r.countries).collect())
    }

    /// Market codes of every country, sorted
    pub async fn list_market_codes(&self) -> Result<Vec<String>> {
        let mut codes: Vec<String> = self
            .list_countries()
            .await?
            .into_iter()
            .map(|c| c.prefix)
            .filter(|p| !p.is_empty())
            .collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    pub async fn is_valid_market_code(&self, market: &str) -> Result<bool> {
        Ok(self
            .list_market_codes()
            .await?
            .iter()
            .any(|code| code == market))
    }

    pub async fn filter_locations_by_market_code(
        &self,
        market: &str,
        locations: Vec<Location>,
    ) -> Result<Vec<Location>> {
        if !self.is_valid_market_code(market).await? {
            return Err(Error::InvalidMarketCode(market.to_string()));
        }
        Ok(locations
            .into_iter()
            .filter(|l| l.market == market)
            .collect())
    }

    pub fn filter_locations_by_mcr_availability(
        &self,
        mcr_available: bool,
        locations: Vec<Location>,
    ) -> Vec<Location> {
        filter_locations_by_mcr_availability(mcr_available, locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_decodes_v2_shape() {
        let loc: Location = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Equinix SY1",
                "country": "Australia",
                "liveDate": 1483189200000,
                "siteCode": "syd-sy1",
                "address": {"street": "639 Gardeners Road", "city": "Sydney"},
                "products": {"mcr": true, "mcrVersion": 2, "megaport": [1, 10, 100], "mcr2": [1000, 2500]},
                "market": "AU",
                "vRouterAvailable": false,
                "status": "Active"
            }"#,
        )
        .unwrap();
        assert_eq!(loc.id, 3);
        assert_eq!(loc.address.city, "Sydney");
        assert!(loc.products.mcr);
        assert_eq!(loc.products.megaport, vec![1, 10, 100]);
        assert!(loc.live_date.is_some());
    }

    #[test]
    fn test_diversity_zone_capabilities() {
        let loc: LocationV3 = serde_json::from_str(
            r#"{
                "id": 5,
                "name": "Global Switch",
                "market": "AU",
                "diversityZones": {
                    "red": {"mcrSpeedMbps": [1000, 5000], "megaportSpeedMbps": [10000], "mveAvailable": true},
                    "blue": {"mcrSpeedMbps": [1000], "megaportSpeedMbps": [1000, 10000, 100000]}
                }
            }"#,
        )
        .unwrap();

        assert!(loc.supports_mcr());
        assert!(loc.supports_mve());
        assert_eq!(loc.mcr_speeds(), vec![1000, 5000]);
        assert_eq!(loc.megaport_speeds(), vec![1000, 10000, 100000]);
        assert!(loc.supports_port_speed_in_zone("BLUE", 100000));
        assert!(!loc.supports_port_speed_in_zone("red", 100000));
        assert!(loc.diversity_zone("green").is_none());
    }

    #[test]
    fn test_location_without_zones() {
        let loc: LocationV3 = serde_json::from_str(r#"{"id": 9, "name": "Empty"}"#).unwrap();
        assert!(!loc.supports_mcr());
        assert!(!loc.supports_mve());
        assert!(loc.megaport_speeds().is_empty());
    }

    #[test]
    fn test_filter_by_mcr_availability() {
        let mut with_mcr = Location {
            id: 1,
            ..Default::default()
        };
        with_mcr.products.mcr = true;
        let without = Location {
            id: 2,
            ..Default::default()
        };

        let kept = filter_locations_by_mcr_availability(true, vec![with_mcr, without.clone()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);

        let kept = filter_locations_by_mcr_availability(false, vec![without]);
        assert_eq!(kept[0].id, 2);
    }
}
