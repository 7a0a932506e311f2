//! Types shared across services

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Response envelope wrapping every API payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub terms: String,
    pub data: T,
}

/// Decodes an explicit `null` the same as a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Provisioning status
// =============================================================================

pub const STATUS_NEW: &str = "NEW";
pub const STATUS_DESIGN: &str = "DESIGN";
pub const STATUS_DEPLOYABLE: &str = "DEPLOYABLE";
pub const STATUS_CONFIGURED: &str = "CONFIGURED";
pub const STATUS_LIVE: &str = "LIVE";
pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUS_CANCELLED_PARENT: &str = "CANCELLED_PARENT";
pub const STATUS_DECOMMISSIONED: &str = "DECOMMISSIONED";

/// A resource in one of these states has finished provisioning
pub const READY_STATES: [&str; 2] = [STATUS_CONFIGURED, STATUS_LIVE];

/// States that list calls skip unless inactive products are requested
pub const INACTIVE_STATES: [&str; 3] = [
    STATUS_CANCELLED,
    STATUS_DECOMMISSIONED,
    STATUS_CANCELLED_PARENT,
];

pub fn is_ready(status: &str) -> bool {
    READY_STATES.iter().any(|s| s.eq_ignore_ascii_case(status))
}

pub fn is_inactive(status: &str) -> bool {
    INACTIVE_STATES.iter().any(|s| s.eq_ignore_ascii_case(status))
}

// =============================================================================
// Product types
// =============================================================================

pub const PRODUCT_MEGAPORT: &str = "MEGAPORT";
pub const PRODUCT_MCR: &str = "MCR2";
pub const PRODUCT_MVE: &str = "MVE";
pub const PRODUCT_VXC: &str = "VXC";
pub const PRODUCT_IX: &str = "IX";

/// Contract terms accepted by the ordering API, in months
pub const VALID_CONTRACT_TERMS: [u32; 4] = [1, 12, 24, 36];

pub fn validate_contract_term(term: u32) -> Result<()> {
    if VALID_CONTRACT_TERMS.contains(&term) {
        Ok(())
    } else {
        Err(Error::InvalidTerm(term))
    }
}

/// VLAN used to request an untagged service
pub const VLAN_UNTAGGED: i32 = -1;
/// VLAN used to ask Megaport to pick one
pub const VLAN_AUTO: i32 = 0;

pub fn validate_vlan(vlan: i32) -> Result<()> {
    match vlan {
        VLAN_UNTAGGED | VLAN_AUTO | 2..=4093 => Ok(()),
        _ => Err(Error::InvalidVlan(vlan)),
    }
}

/// Key/value tag attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

pub(crate) fn tags_to_map(tags: Vec<ResourceTag>) -> HashMap<String, String> {
    tags.into_iter().map(|t| (t.key, t.value)).collect()
}

pub(crate) fn map_to_tags(tags: &HashMap<String, String>) -> Vec<ResourceTag> {
    let mut out: Vec<ResourceTag> = tags
        .iter()
        .map(|(k, v)| ResourceTag {
            key: k.clone(),
            value: v.clone(),
        })
        .collect();
    out.sort_by(|a, b| a.key.cmp(&b.key));
    out
}

/// One entry of a buy response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub technical_service_uid: String,
}

pub(crate) fn confirmation_uids(confirmations: Vec<OrderConfirmation>) -> Result<Vec<String>> {
    if confirmations.is_empty() {
        return Err(Error::EmptyOrderResponse);
    }
    Ok(confirmations
        .into_iter()
        .map(|c| c.technical_service_uid)
        .collect())
}

/// Reference to a product from a port's or router's perspective
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedProduct {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub product_type: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub provisioning_status: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub rate_limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_terms() {
        for term in [1, 12, 24, 36] {
            assert!(validate_contract_term(term).is_ok());
        }
        assert!(matches!(validate_contract_term(6), Err(Error::InvalidTerm(6))));
        assert!(validate_contract_term(0).is_err());
    }

    #[test]
    fn test_vlan_bounds() {
        assert!(validate_vlan(-1).is_ok());
        assert!(validate_vlan(0).is_ok());
        assert!(validate_vlan(2).is_ok());
        assert!(validate_vlan(4093).is_ok());
        assert!(validate_vlan(1).is_err());
        assert!(validate_vlan(4094).is_err());
        assert!(validate_vlan(-2).is_err());
    }

    #[test]
    fn test_status_sets() {
        assert!(is_ready("LIVE"));
        assert!(is_ready("configured"));
        assert!(!is_ready("DEPLOYABLE"));
        assert!(is_inactive("DECOMMISSIONED"));
        assert!(!is_inactive("LIVE"));
    }

    #[test]
    fn test_envelope_defaults() {
        let resp: ApiResponse<Vec<OrderConfirmation>> = serde_json::from_str(
            r#"{"data":[{"technicalServiceUid":"9b1c"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.message, "");
        assert_eq!(confirmation_uids(resp.data).unwrap(), vec!["9b1c".to_string()]);
        assert!(matches!(confirmation_uids(vec![]), Err(Error::EmptyOrderResponse)));
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let resp: ApiResponse<AssociatedProduct> = serde_json::from_str(
            r#"{"message":null,"terms":null,"data":{"productUid":"p1","productName":null,"rateLimit":null}}"#,
        )
        .unwrap();
        assert_eq!(resp.message, "");
        assert_eq!(resp.data.product_uid, "p1");
        assert_eq!(resp.data.product_name, "");
        assert_eq!(resp.data.rate_limit, 0);
    }

    #[test]
    fn test_tags_are_sorted() {
        let mut map = HashMap::new();
        map.insert("team".to_string(), "net".to_string());
        map.insert("env".to_string(), "prod".to_string());
        let tags = map_to_tags(&map);
        assert_eq!(tags[0].key, "env");
        assert_eq!(tags_to_map(tags), map);
    }
}
