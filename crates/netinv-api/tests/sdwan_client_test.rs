#![allow(clippy::unwrap_used)]
// Integration tests for `SdwanClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netinv_api::{Error, SdwanClient, TransportConfig, controller_url};

async fn setup() -> (MockServer, SdwanClient) {
    let server = MockServer::start().await;
    let base_url = controller_url(&server.uri()).unwrap();
    let client = SdwanClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn secret(value: &str) -> secrecy::SecretString {
    value.to_string().into()
}

#[tokio::test]
async fn test_login_and_list_devices_with_xsrf() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .and(body_string_contains("j_username=admin"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/client/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("xsrf-abc"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device"))
        .and(header("X-XSRF-TOKEN", "xsrf-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "host-name": "edge-1",
                "device-model": "vedge-C8000V",
                "version": "17.9.3",
                "uptime-date": 1_700_000_000_000_i64,
                "board-serial": "C8K-1234",
                "system-ip": "1.1.1.1"
            }]
        })))
        .mount(&server)
        .await;

    client.login("admin", &secret("pw")).await.unwrap();
    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].host_name, "edge-1");
    assert_eq!(devices[0].device_model, "vedge-C8000V");
    assert_eq!(devices[0].version.as_deref(), Some("17.9.3"));
    assert_eq!(devices[0].uptime_date, Some(1_700_000_000_000));
    assert_eq!(devices[0].board_serial.as_deref(), Some("C8K-1234"));
}

#[tokio::test]
async fn test_login_page_means_bad_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>login</body></html>"),
        )
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("wrong")).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_devices_non_200() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;
    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("busy"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
