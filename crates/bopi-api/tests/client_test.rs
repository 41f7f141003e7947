#![allow(clippy::unwrap_used)]
// Integration tests for `BopiClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bopi_api::{BopiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BopiClient) {
    setup_with_timeout(5).await
}

async fn setup_with_timeout(timeout_secs: u64) -> (MockServer, BopiClient) {
    let server = MockServer::start().await;
    let url = Url::parse(&server.uri()).unwrap();
    let client = BopiClient::new(
        url.host_str().unwrap(),
        u32::from(url.port().unwrap()),
        timeout_secs,
    )
    .unwrap();
    (server, client)
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_sensors_state() {
    let (server, client) = setup().await;

    let body = json!({
        "temp1": 26.4,
        "temp2": 25.9,
        "boxtemp": 31.0,
        "boxhumidity": 48.0,
        "phvalue": 7.21,
        "redoxvalue": 702.0,
        "uptime": 86400,
        "pool_pump": { "status": true },
        "pool_lights": { "status": false },
        "relay1": { "status": true }
    });

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let state = client.get_sensors_state().await.unwrap();

    assert_eq!(state.temp1, Some(26.4));
    assert_eq!(state.phvalue, Some(7.21));
    assert_eq!(state.uptime, Some(86_400));
    assert!(state.pool_pump.unwrap().status);
    assert!(!state.pool_lights.unwrap().status);
    assert!(state.relay1.unwrap().status);
    assert!(state.relay2.is_none());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_timeout() {
    let (server, client) = setup_with_timeout(1).await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client.get_sensors_state().await;

    assert!(
        matches!(result, Err(Error::Timeout { timeout_secs: 1 })),
        "expected Timeout error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_is_connection_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    match client.get_sensors_state().await {
        Err(Error::Connection { ref reason, .. }) => {
            assert!(reason.contains("503"), "expected status in reason, got: {reason}");
        }
        other => panic!("expected Connection error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop a listener so the port is very likely closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = BopiClient::new("127.0.0.1", u32::from(port), 2).unwrap();

    let result = client.get_sensors_state().await;

    assert!(
        matches!(result, Err(Error::Connection { .. })),
        "expected Connection error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>setup page</html>"))
        .mount(&server)
        .await;

    match client.get_sensors_state().await {
        Err(Error::Validation { ref body, .. }) => {
            assert!(body.contains("setup page"));
        }
        other => panic!("expected Validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_field_type_is_validation_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "phvalue": "high" })))
        .mount(&server)
        .await;

    let result = client.get_sensors_state().await;

    assert!(
        matches!(result, Err(Error::Validation { .. })),
        "expected Validation error, got: {result:?}"
    );
}
