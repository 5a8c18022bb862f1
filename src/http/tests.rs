//! Tests for the HTTP executor module

use super::*;
use crate::config::ScraperConfig;
use crate::error::{Error, ErrorKind};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ScraperConfig {
    ScraperConfig::builder()
        .api_root(server.uri())
        .bearer_token("app-key")
        .build()
}

async fn mount_activate(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/1.1/guest/activate.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "guest_token": "gt-1"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ============================================================================
// Header Tests
// ============================================================================

#[tokio::test]
async fn test_attaches_bearer_and_guest_token() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("Authorization", "Bearer app-key"))
        .and(header("X-Guest-Token", "gt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let response: ApiResponse<Value> = client
        .execute(client.get(format!("{}/api/data", server.uri())))
        .await
        .unwrap();

    assert_eq!(response.data["value"], 42);
    assert!(!response.is_restricted());
}

#[tokio::test]
async fn test_csrf_header_from_cookie() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .and(header("X-CSRF-Token", "csrf-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    client.set_cookie("ct0=csrf-123");
    assert_eq!(client.cookie(CSRF_COOKIE).as_deref(), Some("csrf-123"));

    let result: crate::Result<ApiResponse<Value>> = client
        .execute(client.get(format!("{}/api/data", server.uri())))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_no_csrf_header_without_cookie() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let _: ApiResponse<Value> = client
        .execute(client.get(format!("{}/api/data", server.uri())))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let data_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/data")
        .unwrap();
    assert!(data_request.headers.get("x-csrf-token").is_none());
}

// ============================================================================
// Status Classification Tests
// ============================================================================

#[tokio::test]
async fn test_forbidden_body_is_decoded() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/private"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"partial": true})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let response: ApiResponse<Value> = client
        .execute(client.get(format!("{}/api/private", server.uri())))
        .await
        .unwrap();

    assert!(response.is_restricted());
    assert_eq!(response.data["partial"], true);
}

#[tokio::test]
async fn test_error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/limited"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "code": 88,
            "message": "Rate limit exceeded"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let err = client
        .execute::<Value>(client.get(format!("{}/api/limited", server.uri())))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamApi);
    match err {
        Error::Api { code, message } => {
            assert_eq!(code, 88);
            assert_eq!(message, "Rate limit exceeded");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_raw_error_body_surfaced() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let err = client
        .execute::<Value>(client.get(format!("{}/api/down", server.uri())))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "Service Unavailable");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_transport_error() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let err = client
        .execute::<Value>(client.get(format!("{}/api/garbled", server.uri())))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JsonParse(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_rate_limit_headers_extracted() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Rate-Limit-Limit", "180")
                .insert_header("x-rate-limit-remaining", "17")
                .insert_header("x-rate-limit-reset", "not-a-number")
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let response: ApiResponse<Value> = client
        .execute(client.get(format!("{}/api/data", server.uri())))
        .await
        .unwrap();

    assert_eq!(
        response.rate_limit,
        RateLimitSnapshot {
            limit: 180,
            remaining: 17,
            reset: 0,
        }
    );
}

// ============================================================================
// Credential Tests
// ============================================================================

#[tokio::test]
async fn test_guest_token_reused_within_ttl() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    for _ in 0..2 {
        let _: ApiResponse<Value> = client
            .execute(client.get(format!("{}/api/data", server.uri())))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_guest_token_reissued_past_ttl() {
    let server = MockServer::start().await;
    mount_activate(&server, 2).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let config = ScraperConfig::builder()
        .api_root(server.uri())
        .guest_token_ttl(Duration::ZERO)
        .build();
    let client = ApiClient::new(&config).unwrap();
    for _ in 0..2 {
        let _: ApiResponse<Value> = client
            .execute(client.get(format!("{}/api/data", server.uri())))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_credential_failure_blocks_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.1/guest/activate.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config(&server)).unwrap();
    let err = client
        .execute::<Value>(client.get(format!("{}/api/data", server.uri())))
        .await
        .unwrap_err();

    assert!(err.is_credential_error());
}

// ============================================================================
// Throttle Tests
// ============================================================================

#[tokio::test]
async fn test_delay_spaces_requests() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let config = ScraperConfig::builder()
        .api_root(server.uri())
        .request_delay(Duration::from_secs(2))
        .build();
    let client = ApiClient::new(&config).unwrap();

    let start = Instant::now();
    let _: ApiResponse<Value> = client
        .execute(client.get(format!("{}/api/data", server.uri())))
        .await
        .unwrap();
    let first_done = start.elapsed();
    assert!(first_done < Duration::from_secs(2));

    let _: ApiResponse<Value> = client
        .execute(client.get(format!("{}/api/data", server.uri())))
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_failed_request_still_releases_slot() {
    let server = MockServer::start().await;
    mount_activate(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = ScraperConfig::builder()
        .api_root(server.uri())
        .request_delay(Duration::from_millis(100))
        .build();
    let client = ApiClient::new(&config).unwrap();

    for _ in 0..2 {
        let result = client
            .execute::<Value>(client.get(format!("{}/api/down", server.uri())))
            .await;
        assert!(result.is_err());
    }

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(client.throttle().is_idle());
}

#[test]
fn test_invalid_config_rejected() {
    let config = ScraperConfig::builder().base_url("::nope::").build();
    let err = ApiClient::new(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
