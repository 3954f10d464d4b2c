//! Integration tests for the Vault HTTP client
//!
//! These tests run `VaultHttpClient` against a mockito server and cover:
//! - KV v1 and v2 request paths and response envelopes
//! - Token header handling
//! - Status mapping, retry of transient errors, malformed bodies
//! - End-to-end aggregation through `VaultConfigClient`

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

use vault_config::domain::models::{Config, RetryConfig};
use vault_config::infrastructure::vault::{CLIENT_DESCRIPTION_V1, CLIENT_DESCRIPTION_V2};
use vault_config::{
    AggregationError, FetchError, FetchTarget, KvVersion, PathSpec, RemoteFetcher, VaultConfig,
    VaultConfigClient, VaultHttpClient,
};

fn vault_config(uri: String, kv_version: KvVersion, token: Option<&str>) -> VaultConfig {
    VaultConfig {
        uri,
        kv_version,
        token: token.map(ToString::to_string),
        timeout_secs: 5,
        retry: RetryConfig {
            retry_count: 2,
            retry_delay_ms: 1,
            max_backoff_ms: 5,
        },
        ..VaultConfig::default()
    }
}

fn target(profile: Option<&str>) -> FetchTarget {
    FetchTarget {
        name: profile.map_or_else(|| "orders".to_string(), |p| format!("orders/{p}")),
        path: PathSpec {
            backend: "secret".to_string(),
            application: "orders".to_string(),
            profile: profile.map(ToString::to_string),
        },
    }
}

fn v1_body(data: serde_json::Value) -> String {
    json!({
        "request_id": "5e2a7c1f-1111-2222-3333-444455556666",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 2_764_800,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
    .to_string()
}

fn v2_body(data: serde_json::Value) -> String {
    json!({
        "request_id": "5e2a7c1f-aaaa-bbbb-cccc-ddddeeeeffff",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": data,
            "metadata": {
                "created_time": "2024-03-01T12:00:00.000000Z",
                "deletion_time": "",
                "destroyed": false,
                "version": 4
            }
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
    .to_string()
}

#[tokio::test]
async fn test_fetch_v1_with_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/secret/orders")
        .match_header("x-vault-token", "hvs.integrationtoken01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(v1_body(json!({"db.url": "jdbc:postgresql://db/orders"})))
        .expect(1)
        .create_async()
        .await;

    let client = VaultHttpClient::from_config(&vault_config(
        server.url(),
        KvVersion::V1,
        Some("hvs.integrationtoken01"),
    ))
    .unwrap();
    assert_eq!(client.description(), CLIENT_DESCRIPTION_V1);

    let envelope = client.fetch(&target(None)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(envelope.data["db.url"], json!("jdbc:postgresql://db/orders"));
    assert_eq!(
        envelope.request_id.as_deref(),
        Some("5e2a7c1f-1111-2222-3333-444455556666")
    );
    assert_eq!(envelope.lease_duration.map(|d| d.as_secs()), Some(2_764_800));
}

#[tokio::test]
async fn test_fetch_v2_unwraps_nested_data_without_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/secret/data/orders/prod")
        .match_header("x-vault-token", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(v2_body(json!({"db.url": "y", "timeout": "30"})))
        .create_async()
        .await;

    let client =
        VaultHttpClient::from_config(&vault_config(server.url(), KvVersion::V2, None)).unwrap();
    assert_eq!(client.description(), CLIENT_DESCRIPTION_V2);

    let envelope = client.fetch(&target(Some("prod"))).await.unwrap();

    mock.assert_async().await;
    assert_eq!(envelope.data.len(), 2);
    assert_eq!(envelope.data["timeout"], json!("30"));
    assert!(!envelope.data.contains_key("metadata"));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/secret/orders/prod")
        .with_status(404)
        .with_body(r#"{"errors":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let client =
        VaultHttpClient::from_config(&vault_config(server.url(), KvVersion::V1, None)).unwrap();
    let error = client.fetch(&target(Some("prod"))).await.unwrap_err();

    mock.assert_async().await;
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_server_error_retried_then_reported() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/secret/orders")
        .with_status(503)
        .with_body(r#"{"errors":["Vault is sealed"]}"#)
        .expect(3)
        .create_async()
        .await;

    let client =
        VaultHttpClient::from_config(&vault_config(server.url(), KvVersion::V1, None)).unwrap();
    let error = client.fetch(&target(None)).await.unwrap_err();

    mock.assert_async().await;
    match error {
        FetchError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("Vault is sealed"));
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_body_is_scrubbed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/secret/orders")
        .with_status(403)
        .with_body(r#"{"errors":["permission denied for hvs.leakedtoken0123456789"]}"#)
        .create_async()
        .await;

    let client =
        VaultHttpClient::from_config(&vault_config(server.url(), KvVersion::V1, None)).unwrap();
    let error = client.fetch(&target(None)).await.unwrap_err();

    let message = error.to_string();
    assert!(!message.contains("hvs.leakedtoken0123456789"));
    assert!(message.contains("[TOKEN_REDACTED]"));
}

#[tokio::test]
async fn test_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/secret/orders")
        .with_status(200)
        .with_body("<html>not vault</html>")
        .create_async()
        .await;

    let client =
        VaultHttpClient::from_config(&vault_config(server.url(), KvVersion::V1, None)).unwrap();
    let error = client.fetch(&target(None)).await.unwrap_err();

    assert!(matches!(error, FetchError::Malformed(_)));
    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Port 9 (discard) is not expected to be listening
    let config = VaultConfig {
        retry: RetryConfig {
            retry_count: 0,
            retry_delay_ms: 1,
            max_backoff_ms: 5,
        },
        ..vault_config("http://127.0.0.1:9".to_string(), KvVersion::V1, None)
    };
    let client = VaultHttpClient::from_config(&config).unwrap();
    let error = client.fetch(&target(None)).await.unwrap_err();

    assert!(matches!(error, FetchError::Network(_) | FetchError::Timeout));
}

fn client_config(uri: String, fail_fast: bool) -> Config {
    let mut config = Config::default();
    config.application.name = "orders".to_string();
    config.application.profiles = vec!["prod".to_string(), "eu".to_string()];
    config.vault = VaultConfig {
        fail_fast,
        max_priority: 1_000,
        ..vault_config(uri, KvVersion::V2, Some("hvs.integrationtoken01"))
    };
    config
}

#[tokio::test]
async fn test_end_to_end_missing_profile_tolerated() {
    let mut server = Server::new_async().await;
    let base = server
        .mock("GET", "/v1/secret/data/orders")
        .match_header("x-vault-token", "hvs.integrationtoken01")
        .with_status(200)
        .with_body(v2_body(json!({"db.url": "x"})))
        .create_async()
        .await;
    let prod = server
        .mock("GET", "/v1/secret/data/orders/prod")
        .with_status(200)
        .with_body(v2_body(json!({"db.url": "y", "timeout": "30"})))
        .create_async()
        .await;
    let eu = server
        .mock("GET", "/v1/secret/data/orders/eu")
        .with_status(404)
        .with_body(r#"{"errors":[]}"#)
        .create_async()
        .await;

    let config = client_config(server.url(), false);
    let fetcher = Arc::new(VaultHttpClient::from_config(&config.vault).unwrap());
    let client = VaultConfigClient::new(config, fetcher);

    let sources = client.property_sources().await.unwrap();

    base.assert_async().await;
    prod.assert_async().await;
    eu.assert_async().await;

    let pairs: Vec<_> = sources.iter().map(|s| (s.name.as_str(), s.priority)).collect();
    assert_eq!(pairs, vec![("orders", 998), ("orders/prod", 999)]);
    assert_eq!(sources[1].get("timeout"), Some(&json!("30")));
}

#[tokio::test]
async fn test_end_to_end_missing_profile_fail_fast() {
    let mut server = Server::new_async().await;
    let _base = server
        .mock("GET", "/v1/secret/data/orders")
        .with_status(200)
        .with_body(v2_body(json!({"db.url": "x"})))
        .create_async()
        .await;
    let _prod = server
        .mock("GET", "/v1/secret/data/orders/prod")
        .with_status(200)
        .with_body(v2_body(json!({"db.url": "y"})))
        .create_async()
        .await;
    let _eu = server
        .mock("GET", "/v1/secret/data/orders/eu")
        .with_status(404)
        .create_async()
        .await;

    let config = client_config(server.url(), true);
    let fetcher = Arc::new(VaultHttpClient::from_config(&config.vault).unwrap());
    let client = VaultConfigClient::new(config, fetcher);

    let error = client.property_sources().await.unwrap_err();
    assert!(matches!(error, AggregationError::NotFound { .. }));
    assert_eq!(error.target(), "orders/eu");
}

#[tokio::test]
async fn test_end_to_end_disabled_makes_no_requests() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut config = client_config(server.url(), true);
    config.vault.enabled = false;
    let fetcher = Arc::new(VaultHttpClient::from_config(&config.vault).unwrap());
    let client = VaultConfigClient::new(config, fetcher);

    assert!(client.property_sources().await.unwrap().is_empty());
    mock.assert_async().await;
}
