//! Generic product actions shared by ports, MCRs, MVEs and VXCs

use std::collections::HashMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{
    confirmation_uids, is_inactive, map_to_tags, tags_to_map, OrderConfirmation, ResourceTag,
};

/// Product types accepted by the modify endpoint
pub const MODIFIABLE_PRODUCT_TYPES: [&str; 3] = ["megaport", "mcr2", "mve"];

/// Parameters for renaming or re-billing a product
#[derive(Debug, Clone, Default)]
pub struct ModifyProductRequest {
    pub product_uid: String,
    /// One of `megaport`, `mcr2` or `mve`
    pub product_type: String,
    pub name: String,
    pub cost_centre: String,
    pub marketplace_visibility: Option<bool>,
    pub contract_term_months: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyProductBody<'a> {
    name: &'a str,
    cost_centre: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    marketplace_visibility: Option<bool>,
    #[serde(rename = "term", skip_serializing_if = "Option::is_none")]
    contract_term_months: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductTypeOnly {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    product_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceTagsBody {
    resource_tags: Vec<ResourceTag>,
}

pub struct ProductService {
    client: Client,
}

impl ProductService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Place an order and return the technical service UIDs it created
    pub async fn execute_order<B: Serialize + ?Sized>(&self, order: &B) -> Result<Vec<String>> {
        let confirmations: Vec<OrderConfirmation> =
            self.client.post("/v3/networkdesign/buy", order).await?;
        let uids = confirmation_uids(confirmations)?;
        tracing::info!(uids = ?uids, "Order placed");
        Ok(uids)
    }

    /// Ask Megaport to validate an order without placing it
    pub async fn validate_product_order<B: Serialize + ?Sized>(&self, order: &B) -> Result<()> {
        let _: Option<serde_json::Value> =
            self.client.post("/v3/networkdesign/validate", order).await?;
        Ok(())
    }

    pub async fn get_product_type(&self, product_uid: &str) -> Result<String> {
        let product: ProductTypeOnly = self
            .client
            .get(&format!("/v2/product/{}", product_uid), &[])
            .await?;
        Ok(product.product_type)
    }

    pub(crate) async fn get_product<T: DeserializeOwned>(&self, product_uid: &str) -> Result<T> {
        self.client
            .get(&format!("/v2/product/{}", product_uid), &[])
            .await
    }

    /// Raw product listing
    pub async fn list_products(&self) -> Result<Vec<serde_json::Value>> {
        self.client.get("/v2/products", &[]).await
    }

    /// Products of one type, decoded. Inactive products are skipped unless
    /// `include_inactive` is set.
    pub(crate) async fn list_products_of_type<T: DeserializeOwned>(
        &self,
        product_type: &str,
        include_inactive: bool,
    ) -> Result<Vec<T>> {
        let products = self.list_products().await?;
        let mut out = Vec::new();
        for product in products {
            let kind = product
                .get("productType")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            if !kind.eq_ignore_ascii_case(product_type) {
                continue;
            }
            let status = product
                .get("provisioningStatus")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            if !include_inactive && is_inactive(status) {
                continue;
            }
            out.push(serde_json::from_value(product)?);
        }
        Ok(out)
    }

    pub async fn modify_product(&self, req: &ModifyProductRequest) -> Result<()> {
        let product_type = req.product_type.to_ascii_lowercase();
        if !MODIFIABLE_PRODUCT_TYPES.contains(&product_type.as_str()) {
            return Err(Error::WrongProductModify(req.product_type.clone()));
        }

        let body = ModifyProductBody {
            name: &req.name,
            cost_centre: &req.cost_centre,
            marketplace_visibility: req.marketplace_visibility,
            contract_term_months: req.contract_term_months,
        };

        let _: Option<serde_json::Value> = self
            .client
            .put(
                &format!("/v2/product/{}/{}", product_type, req.product_uid),
                &body,
            )
            .await?;
        Ok(())
    }

    /// Cancel a product, immediately or at the end of its term
    pub async fn delete_product(&self, product_uid: &str, delete_now: bool) -> Result<()> {
        let action = if delete_now { "CANCEL_NOW" } else { "CANCEL" };
        self.client
            .send(
                Method::POST,
                &format!("/v3/product/{}/action/{}", product_uid, action),
            )
            .await?;
        tracing::info!(product_uid, action, "Product cancelled");
        Ok(())
    }

    /// Undo a pending cancellation
    pub async fn restore_product(&self, product_uid: &str) -> Result<()> {
        self.client
            .send(
                Method::POST,
                &format!("/v3/product/{}/action/UN_CANCEL", product_uid),
            )
            .await?;
        Ok(())
    }

    pub async fn manage_product_lock(&self, product_uid: &str, lock: bool) -> Result<()> {
        let method = if lock { Method::POST } else { Method::DELETE };
        self.client
            .send(method, &format!("/v2/product/{}/lock", product_uid))
            .await?;
        Ok(())
    }

    pub async fn list_product_resource_tags(
        &self,
        product_uid: &str,
    ) -> Result<HashMap<String, String>> {
        let tags: Option<Vec<ResourceTag>> = self
            .client
            .get(&format!("/v2/product/{}/tags", product_uid), &[])
            .await?;
        Ok(tags_to_map(tags.unwrap_or_default()))
    }

    /// Replace all resource tags on a product
    pub async fn update_product_resource_tags(
        &self,
        product_uid: &str,
        tags: &HashMap<String, String>,
    ) -> Result<()> {
        let body = ResourceTagsBody {
            resource_tags: map_to_tags(tags),
        };
        let _: Option<serde_json::Value> = self
            .client
            .put(&format!("/v2/product/{}/tags", product_uid), &body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modify_body_shape() {
        let body = ModifyProductBody {
            name: "edge-1",
            cost_centre: "ops",
            marketplace_visibility: Some(false),
            contract_term_months: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["name"], "edge-1");
        assert_eq!(json["costCentre"], "ops");
        assert_eq!(json["marketplaceVisibility"], false);
        assert!(json.get("term").is_none());
    }

    #[tokio::test]
    async fn test_modify_rejects_vxc() {
        let client = Client::new("t").unwrap();
        let err = client
            .products()
            .modify_product(&ModifyProductRequest {
                product_uid: "abc".into(),
                product_type: "VXC".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WrongProductModify(ref t) if t == "VXC"));
    }
}
