//! Tests for the HTTP session module

use super::*;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.default_headers.is_empty());
    assert!(config.user_agent.starts_with("shopsnap/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .header("X-Shopify-Access-Token", "shpat_test")
        .header("Content-Type", "application/json")
        .user_agent("custom-agent")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(
        config.default_headers.get("X-Shopify-Access-Token"),
        Some(&"shpat_test".to_string())
    );
    assert_eq!(config.user_agent, "custom-agent");
}

#[tokio::test]
async fn test_get_applies_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .header("X-Shopify-Access-Token", "shpat_test")
            .header("Content-Type", "application/json")
            .build(),
    );

    let response = client
        .get(&format!("{}/protected", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_get_returns_non_200_response_unclassified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    // The session must hand back 429s untouched so the fetch loop can apply
    // its own cooldown policy.
    let client = HttpClient::new();
    let response = client
        .get(&format!("{}/limited", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 429);
}
