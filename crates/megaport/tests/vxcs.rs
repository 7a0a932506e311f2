mod common;

use std::time::Duration;

use megaport::services::vxc::{
    GoogleConfig, LookupPartnerPortsRequest, SecurePartner, VRouterConfig, VxcOrderEndpoint,
};
use megaport::{BuyVxcRequest, Error, PartnerConfig, UpdateVxcRequest, WaitOptions};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, envelope};

fn vxc_json(status: &str, rate_limit: u32) -> serde_json::Value {
    json!({
        "productUid": "vxc-1",
        "productName": "to-google",
        "productType": "VXC",
        "rateLimit": rate_limit,
        "provisioningStatus": status,
        "aEnd": {"productUid": "mcr-1", "vlan": 0, "locationId": 3},
        "bEnd": {"productUid": "gcp-port", "vlan": 0, "locationId": 3},
        "resources": {"vll": {"rate_limit_mbps": rate_limit, "resource_type": "vll"}}
    })
}

fn google_order() -> BuyVxcRequest {
    BuyVxcRequest {
        port_uid: "mcr-1".into(),
        vxc_name: "to-google".into(),
        rate_limit: 100,
        term: 12,
        a_end: VxcOrderEndpoint {
            vlan: 0,
            partner_config: Some(PartnerConfig::VRouter(VRouterConfig::default())),
            ..Default::default()
        },
        b_end: VxcOrderEndpoint {
            product_uid: "gcp-port".into(),
            partner_config: Some(PartnerConfig::Google(GoogleConfig {
                pairing_key: "pairing-key/us-east4/1".into(),
            })),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_buy_vxc_and_wait() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/networkdesign/buy"))
        .and(body_partial_json(json!([{
            "productUid": "mcr-1",
            "associatedVxcs": [{
                "productName": "to-google",
                "rateLimit": 100,
                "aEnd": {"vlan": 0, "partnerConfig": {"connectType": "VROUTER"}},
                "bEnd": {
                    "productUid": "gcp-port",
                    "partnerConfig": {"connectType": "GOOGLE", "pairingKey": "pairing-key/us-east4/1"}
                }
            }]
        }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"technicalServiceUid": "vxc-1"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vxc_json("LIVE", 100))))
        .mount(&server)
        .await;

    let mut req = google_order();
    req.wait = WaitOptions::for_provision().with_timeout(Duration::from_secs(5));
    let uid = assert_ok!(client(&server).vxcs().buy_vxc(req).await);
    assert_eq!(uid, "vxc-1");
}

#[tokio::test]
async fn test_a_end_must_be_a_router_config() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut req = google_order();
    req.a_end.partner_config = Some(PartnerConfig::Transit);
    let err = assert_err!(client(&server).vxcs().buy_vxc(req).await);
    assert!(matches!(err, Error::InvalidVxcAEndPartnerConfig));
}

#[tokio::test]
async fn test_update_vxc_and_wait() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v3/product/vxc/vxc-1"))
        .and(body_json(json!({"rateLimit": 500, "aEndVlan": 110})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vxc_json("CONFIGURED", 500))),
        )
        .mount(&server)
        .await;

    let updated = assert_ok!(
        client(&server)
            .vxcs()
            .update_vxc(
                "vxc-1",
                UpdateVxcRequest {
                    rate_limit: Some(500),
                    a_end_vlan: Some(110),
                    wait: WaitOptions::for_update(),
                    ..Default::default()
                },
            )
            .await
    );
    let vxc = updated.unwrap();
    assert_eq!(vxc.rate_limit, 500);
    assert_eq!(vxc.resources.vll.unwrap().rate_limit_mbps, 500);
}

#[tokio::test]
async fn test_lookup_partner_ports() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/secure/google/pairing-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "bandwidths": [50, 100, 200, 300, 400, 500, 1000],
            "megaports": [
                {"port": 1, "productUid": "taken", "vxc": 12, "locationId": 3},
                {"port": 2, "productUid": "gcp-port", "locationId": 3}
            ],
            "resource_type": "csp_connection",
            "service_key": "pairing-key"
        }))))
        .mount(&server)
        .await;

    let vxcs = client(&server).vxcs();
    let req = LookupPartnerPortsRequest {
        key: "pairing-key".into(),
        port_speed: 100,
        partner: SecurePartner::Google,
        product_uid: None,
    };
    let port = assert_ok!(vxcs.lookup_partner_ports(&req).await);
    assert_eq!(port.product_uid, "gcp-port");

    let err = assert_err!(
        vxcs.lookup_partner_ports(&LookupPartnerPortsRequest {
            port_speed: 10000,
            ..req
        })
        .await
    );
    assert!(matches!(err, Error::NoAvailablePartnerPort(10000)));
}

#[tokio::test]
async fn test_update_vxc_cancelled_while_waiting() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v3/product/vxc/vxc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(vxc_json("DEPLOYABLE", 500))),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = assert_err!(
        client(&server)
            .vxcs()
            .update_vxc(
                "vxc-1",
                UpdateVxcRequest {
                    rate_limit: Some(500),
                    wait: WaitOptions::for_update().with_cancel(token),
                    ..Default::default()
                },
            )
            .await
    );
    assert!(matches!(err, Error::Cancelled { resource: "vxc", ref uid } if uid == "vxc-1"));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_delete_vxc_actions() {
    let server = MockServer::start().await;

    for action in ["CANCEL", "CANCEL_NOW"] {
        Mock::given(method("POST"))
            .and(path(format!("/v3/product/vxc-2/action/{action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": action})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let vxcs = client(&server).vxcs();
    assert_ok!(vxcs.delete_vxc("vxc-2", false).await);
    assert_ok!(vxcs.delete_vxc("vxc-2", true).await);
}

#[tokio::test]
async fn test_lookup_key_is_path_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/secure/google/a%2Fb%20c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "bandwidths": [100],
            "megaports": [{"port": 2, "productUid": "gcp-port", "locationId": 3}]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let port = assert_ok!(
        client(&server)
            .vxcs()
            .lookup_partner_ports(&LookupPartnerPortsRequest {
                key: "a/b c".into(),
                port_speed: 100,
                partner: SecurePartner::Google,
                product_uid: None,
            })
            .await
    );
    assert_eq!(port.product_uid, "gcp-port");
}
