mod common;

use megaport::{
    CreateServiceKeyRequest, CreateUserRequest, Error, UpdateServiceKeyRequest, UpdateUserRequest,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, envelope};

#[tokio::test]
async fn test_service_key_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/service/key"))
        .and(body_partial_json(json!({
            "productUid": "port-1",
            "maxSpeed": 1000,
            "singleUse": false,
            "active": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "key": "8c6b7d2e-key",
            "productUid": "port-1",
            "maxSpeed": 1000,
            "active": true
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/service/key"))
        .and(query_param("productIdOrUid", "port-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"key": "8c6b7d2e-key", "productUid": "port-1", "active": true, "createDate": 1700000000000u64}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/service/key"))
        .and(query_param("key", "8c6b7d2e-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "key": "8c6b7d2e-key",
            "productUid": "port-1",
            "active": false
        }))))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v2/service/key"))
        .and(body_json(json!({
            "key": "8c6b7d2e-key",
            "singleUse": false,
            "active": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let keys = client(&server).service_keys();
    let key = assert_ok!(
        keys.create_service_key(CreateServiceKeyRequest {
            product_uid: "port-1".into(),
            max_speed: 1000,
            active: true,
            ..Default::default()
        })
        .await
    );
    assert_eq!(key, "8c6b7d2e-key");

    let listed = assert_ok!(keys.list_service_keys(Some("port-1")).await);
    assert_eq!(listed.len(), 1);
    assert!(listed[0].create_date.is_some());

    assert!(assert_ok!(
        keys.update_service_key(UpdateServiceKeyRequest {
            key: key.clone(),
            active: false,
            ..Default::default()
        })
        .await
    ));

    let fetched = assert_ok!(keys.get_service_key(&key).await);
    assert!(!fetched.active);
}

#[tokio::test]
async fn test_missing_service_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/service/key"))
        .and(query_param("key", "nope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).service_keys().get_service_key("nope").await);
    assert!(matches!(err, Error::ServiceKeyNotFound(ref k) if k == "nope"));
}

#[tokio::test]
async fn test_partner_ports_narrowing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/dropdowns/partner/megaports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"connectType": "AWS", "productUid": "aws-syd", "title": "Asia Pacific (Sydney) (ap-southeast-2)",
             "companyName": "AWS", "locationId": 3, "diversityZone": "red", "speed": 10000, "vxcPermitted": true},
            {"connectType": "AWSHC", "productUid": "aws-hc-syd", "title": "Asia Pacific (Sydney) (ap-southeast-2)",
             "companyName": "AWS", "locationId": 3, "diversityZone": "blue", "speed": 10000, "vxcPermitted": true},
            {"connectType": "AZURE", "productUid": "azure-syd", "title": "Azure ExpressRoute Sydney",
             "companyName": "Microsoft", "locationId": 3, "diversityZone": "red", "speed": 10000, "vxcPermitted": true}
        ]))))
        .mount(&server)
        .await;

    let partners = client(&server).partners();
    let all = assert_ok!(partners.list_partner_megaports().await);
    assert_eq!(all.len(), 3);

    let aws = assert_ok!(partners.filter_partner_megaport_by_connect_type(
        all.clone(),
        "AWS",
        false
    ));
    assert_eq!(aws.len(), 2);

    let blue = assert_ok!(partners.filter_partner_megaport_by_diversity_zone(aws, "blue", true));
    assert_eq!(blue[0].product_uid, "aws-hc-syd");

    let err = assert_err!(partners.filter_partner_megaport_by_company_name(all, "Oracle", true));
    assert!(matches!(err, Error::NoPartnerPortsFound));
}

#[tokio::test]
async fn test_user_management() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/employment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"employmentId": 1, "firstName": "Ada", "email": "ada@example.com", "position": "Company Admin", "active": true},
            {"employmentId": 2, "firstName": "Lin", "email": "lin@example.com", "position": "Read Only", "active": true}
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/employment"))
        .and(body_partial_json(json!({
            "firstName": "Sam",
            "email": "sam@example.com",
            "position": "Technical Contact"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "employmentId": 3,
            "firstName": "Sam",
            "email": "sam@example.com",
            "position": "Technical Contact"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v2/employee/3"))
        .and(body_json(json!({"position": "Finance"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v2/employee/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v3/users/activity"))
        .and(query_param("personUid", "p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"personUid": "p-1", "description": "Logged in", "createDate": 1700000000000u64}
        ]))))
        .mount(&server)
        .await;

    let users = client(&server).users();
    let listed = assert_ok!(users.list_company_users().await);
    assert_eq!(listed.len(), 2);

    let created = assert_ok!(
        users
            .create_user(CreateUserRequest {
                first_name: "Sam".into(),
                last_name: "Lee".into(),
                email: "sam@example.com".into(),
                position: "Technical Contact".into(),
                active: true,
                ..Default::default()
            })
            .await
    );
    assert_eq!(created.employee_id, 3);

    assert_ok!(
        users
            .update_user(
                3,
                UpdateUserRequest {
                    position: Some("Finance".into()),
                    ..Default::default()
                },
            )
            .await
    );
    assert_ok!(users.delete_user(3).await);

    let activity = assert_ok!(users.get_user_activity(Some("p-1")).await);
    assert_eq!(activity[0].description, "Logged in");
}

#[tokio::test]
async fn test_invalid_position_is_rejected_locally() {
    let server = MockServer::start().await;

    let err = assert_err!(
        client(&server)
            .users()
            .create_user(CreateUserRequest {
                email: "x@example.com".into(),
                position: "Intern".into(),
                ..Default::default()
            })
            .await
    );
    assert!(matches!(err, Error::InvalidUserPosition(ref p) if p == "Intern"));
}

#[tokio::test]
async fn test_missing_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/employee/404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(null))))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).users().get_user(404).await);
    assert!(matches!(err, Error::UserNotFound(404)));
}
