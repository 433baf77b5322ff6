//! HTTP client tests against a mock backend

#![allow(clippy::unwrap_used)]

use serde_json::json;
use std::time::Duration;
use taxpayer_registry::{
    ClientError, CreateOutcome, HttpTaxpayerClient, NewTaxpayer, Taxpayer, TaxpayerClient,
    TaxpayerId,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpTaxpayerClient {
    HttpTaxpayerClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn ann() -> Taxpayer {
    Taxpayer::new(TaxpayerId::new(1), "Ann", "Lee", "1 Main St")
}

#[tokio::test]
async fn lists_taxpayers_in_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxpayers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"tid": "2", "firstName": "Bo", "lastName": "Ng", "address": "2 Oak Rd"},
            {"tid": 1, "firstName": "Ann", "lastName": "Lee", "address": "1 Main St"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let taxpayers = client_for(&server).get_all_taxpayers().await.unwrap();

    assert_eq!(
        taxpayers,
        vec![Taxpayer::new(TaxpayerId::new(2), "Bo", "Ng", "2 Oak Rd"), ann()]
    );
}

#[tokio::test]
async fn looks_up_by_tid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxpayers/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"tid": "1", "firstName": "Ann", "lastName": "Lee", "address": "1 Main St"}
        )))
        .mount(&server)
        .await;

    let found = client_for(&server).get_taxpayer_by_tid(TaxpayerId::new(1)).await.unwrap();

    assert_eq!(found, Some(ann()));
}

#[tokio::test]
async fn missing_taxpayer_is_none_for_404_and_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxpayers/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/taxpayers/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert_eq!(client.get_taxpayer_by_tid(TaxpayerId::new(7)).await.unwrap(), None);
    assert_eq!(client.get_taxpayer_by_tid(TaxpayerId::new(8)).await.unwrap(), None);
}

#[tokio::test]
async fn large_ids_stay_exact_in_the_path() {
    let server = MockServer::start().await;
    let tid = TaxpayerId::new(u128::MAX);
    Mock::given(method("GET"))
        .and(path(format!("/taxpayers/{}", u128::MAX)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"tid": u128::MAX.to_string(), "firstName": "Ann", "lastName": "Lee", "address": "1 Main St"}
        )))
        .mount(&server)
        .await;

    let found = client_for(&server).get_taxpayer_by_tid(tid).await.unwrap();

    assert_eq!(found.map(|t| t.tid), Some(tid));
}

#[tokio::test]
async fn create_posts_fields_and_reads_ok() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/taxpayers"))
        .and(body_json(json!({"firstName": "Ann", "lastName": "Lee", "address": "1 Main St"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": {"tid": "1", "firstName": "Ann", "lastName": "Lee", "address": "1 Main St"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .create_taxpayer(NewTaxpayer::new("Ann", "Lee", "1 Main St"))
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Created(ann()));
}

#[tokio::test]
async fn create_reads_err_as_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/taxpayers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"err": "duplicate entry"})))
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .create_taxpayer(NewTaxpayer::new("Ann", "Lee", "1 Main St"))
        .await
        .unwrap();

    assert_eq!(outcome, CreateOutcome::Rejected("duplicate entry".to_string()));
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxpayers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("canister trapped"))
        .mount(&server)
        .await;

    let error = client_for(&server).get_all_taxpayers().await.unwrap_err();

    assert_eq!(
        error,
        ClientError::Status {
            status: 500,
            message: "canister trapped".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_body_maps_to_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxpayers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client_for(&server).get_all_taxpayers().await.unwrap_err();

    assert!(matches!(error, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_maps_to_transport() {
    // Nothing listens on port 1
    let client = HttpTaxpayerClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    let error = client.get_all_taxpayers().await.unwrap_err();

    assert!(matches!(error, ClientError::Transport(_)));
}

#[tokio::test]
async fn slow_backend_times_out_as_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxpayers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = HttpTaxpayerClient::new(server.uri(), Duration::from_millis(100)).unwrap();
    let error = client.get_all_taxpayers().await.unwrap_err();

    assert!(matches!(error, ClientError::Transport(_)));
}
