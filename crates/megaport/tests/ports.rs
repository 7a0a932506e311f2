mod common;

use std::collections::HashMap;
use std::time::Duration;

use megaport::{BuyPortRequest, Error, ModifyPortRequest, WaitOptions};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, envelope};

fn port_json(uid: &str, status: &str, locked: bool) -> serde_json::Value {
    json!({
        "productId": 101,
        "productUid": uid,
        "productName": "sydney-edge",
        "productType": "MEGAPORT",
        "provisioningStatus": status,
        "portSpeed": 10000,
        "locationId": 3,
        "market": "AU",
        "locked": locked,
        "liveDate": null
    })
}

#[tokio::test]
async fn test_buy_port_waits_until_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/networkdesign/buy"))
        .and(body_partial_json(json!([{
            "name": "sydney-edge",
            "term": 12,
            "productType": "MEGAPORT",
            "portSpeed": 10000,
            "locationId": 3,
            "market": "AU"
        }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"technicalServiceUid": "port-1"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "port-1",
            "DEPLOYABLE",
            false
        ))))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "port-1",
            "CONFIGURED",
            false
        ))))
        .mount(&server)
        .await;

    let uids = assert_ok!(
        client(&server)
            .ports()
            .buy_port(BuyPortRequest {
                name: "sydney-edge".into(),
                term: 12,
                port_speed: 10000,
                location_id: 3,
                market: "AU".into(),
                wait: WaitOptions::for_provision().with_timeout(Duration::from_secs(5)),
                ..Default::default()
            })
            .await
    );
    assert_eq!(uids, vec!["port-1".to_string()]);
}

#[tokio::test]
async fn test_buy_port_wait_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/networkdesign/buy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"technicalServiceUid": "port-2"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "port-2",
            "DEPLOYABLE",
            false
        ))))
        .mount(&server)
        .await;

    let err = assert_err!(
        client(&server)
            .ports()
            .buy_port(BuyPortRequest {
                name: "slow".into(),
                term: 1,
                port_speed: 1000,
                location_id: 3,
                wait: WaitOptions::for_provision().with_timeout(Duration::from_millis(100)),
                ..Default::default()
            })
            .await
    );
    assert!(err.is_timeout());
    assert!(matches!(err, Error::WaitTimeout { resource: "port", ref uid, .. } if uid == "port-2"));
}

#[tokio::test]
async fn test_invalid_speed_never_reaches_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = assert_err!(
        client(&server)
            .ports()
            .buy_port(BuyPortRequest {
                name: "bad".into(),
                term: 12,
                port_speed: 2500,
                location_id: 3,
                ..Default::default()
            })
            .await
    );
    assert!(matches!(err, Error::InvalidPortSpeed(2500)));
}

#[tokio::test]
async fn test_list_ports_skips_other_products_and_cancelled() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            port_json("live", "LIVE", false),
            port_json("gone", "CANCELLED", false),
            {"productUid": "mcr-1", "productType": "MCR2", "provisioningStatus": "LIVE"}
        ]))))
        .mount(&server)
        .await;

    let ports = client(&server);
    let active = assert_ok!(ports.ports().list_ports(false).await);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].product_uid, "live");

    let all = assert_ok!(ports.ports().list_ports(true).await);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_lock_rejects_locked_port() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "port-3",
            "LIVE",
            true
        ))))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v2/product/port-3/lock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "unlocked"})))
        .expect(1)
        .mount(&server)
        .await;

    let ports = client(&server).ports();
    let err = assert_err!(ports.lock_port("port-3").await);
    assert!(matches!(err, Error::PortAlreadyLocked(ref uid) if uid == "port-3"));
    assert_ok!(ports.unlock_port("port-3").await);
}

#[tokio::test]
async fn test_modify_port_without_wait() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2/product/megaport/port-4"))
        .and(body_json(json!({"name": "renamed", "costCentre": "netops"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let updated = assert_ok!(
        client(&server)
            .ports()
            .modify_port(ModifyPortRequest {
                port_uid: "port-4".into(),
                name: "renamed".into(),
                cost_centre: "netops".into(),
                ..Default::default()
            })
            .await
    );
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_vlan_availability() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-5/vlan"))
        .and(query_param("vlan", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([100, 101, 102]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port/port-5/vlan"))
        .and(query_param("vlan", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([201]))))
        .mount(&server)
        .await;

    let ports = client(&server).ports();
    assert!(assert_ok!(ports.check_port_vlan_availability("port-5", 100).await));
    assert!(!assert_ok!(ports.check_port_vlan_availability("port-5", 200).await));
}

#[tokio::test]
async fn test_resource_tags() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-6/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"key": "env", "value": "prod"},
            {"key": "team", "value": "network"}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v2/product/port-6/tags"))
        .and(body_json(json!({"resourceTags": [{"key": "env", "value": "staging"}]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ports = client(&server).ports();
    let tags = assert_ok!(ports.list_port_resource_tags("port-6").await);
    assert_eq!(tags.get("team").map(String::as_str), Some("network"));

    let update = HashMap::from([("env".to_string(), "staging".to_string())]);
    assert_ok!(ports.update_port_resource_tags("port-6", &update).await);
}

#[tokio::test]
async fn test_unlock_rejects_unlocked_port() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/port-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "port-5",
            "LIVE",
            false
        ))))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v2/product/port-5/lock"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).ports().unlock_port("port-5").await);
    assert!(matches!(err, Error::PortNotLocked(ref uid) if uid == "port-5"));
}

#[tokio::test]
async fn test_cancel_and_restore_actions() {
    let server = MockServer::start().await;

    for action in ["CANCEL", "CANCEL_NOW", "UN_CANCEL"] {
        Mock::given(method("POST"))
            .and(path(format!("/v3/product/port-6/action/{action}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": action})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ports = client(&server).ports();
    assert_ok!(ports.delete_port("port-6", false).await);
    assert_ok!(ports.delete_port("port-6", true).await);
    assert_ok!(ports.restore_port("port-6").await);
}

#[tokio::test]
async fn test_get_port_tolerates_null_strings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/product/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "productUid": "p1",
            "provisioningStatus": "LIVE",
            "costCentre": null,
            "secondaryName": null,
            "diversityZone": null
        }))))
        .mount(&server)
        .await;

    let port = assert_ok!(client(&server).ports().get_port("p1").await);
    assert_eq!(port.provisioning_status, "LIVE");
    assert_eq!(port.cost_centre, "");
    assert_eq!(port.secondary_name, "");
}

#[tokio::test]
async fn test_lag_ports_share_one_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/networkdesign/buy"))
        .and(body_partial_json(json!([{"lagPortCount": 2}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"technicalServiceUid": "lag-a"},
            {"technicalServiceUid": "lag-b"}
        ]))))
        .mount(&server)
        .await;

    // lag-a settles after roughly 200ms of polling, lag-b never does
    Mock::given(method("GET"))
        .and(path("/v2/product/lag-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "lag-a",
            "DEPLOYABLE",
            false
        ))))
        .up_to_n_times(20)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/lag-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "lag-a",
            "CONFIGURED",
            false
        ))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/lag-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(port_json(
            "lag-b",
            "DEPLOYABLE",
            false
        ))))
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let err = assert_err!(
        client(&server)
            .ports()
            .buy_port(BuyPortRequest {
                name: "lag".into(),
                term: 1,
                port_speed: 10000,
                location_id: 3,
                lag_count: 2,
                wait: WaitOptions::for_provision().with_timeout(Duration::from_millis(400)),
                ..Default::default()
            })
            .await
    );

    match err {
        Error::WaitTimeout { uid, waited, .. } => {
            assert_eq!(uid, "lag-b");
            assert!(waited >= Duration::from_millis(400));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_millis(600));
}
