//! Vault store tests against a mocked KV v2 endpoint

use config_secrets::secrets::{SecretStore, VaultSecretStore, VaultStoreConfig};
use config_secrets::{ConfigSecretsError, ConfigTree, ProviderSettings, SecretString, SecretsConfigProvider};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn kv2_response(data: serde_json::Value) -> serde_json::Value {
    json!({
        "request_id": "5f3d1c2e-0000-0000-0000-000000000000",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": data,
            "metadata": {
                "created_time": "2024-01-01T00:00:00.000000Z",
                "custom_metadata": null,
                "deletion_time": "",
                "destroyed": false,
                "version": 1
            }
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

fn store_for(server: &MockServer) -> VaultSecretStore {
    VaultSecretStore::new(VaultStoreConfig {
        address: server.uri(),
        token: Some(SecretString::new("test-token")),
        namespace: None,
        kv_mount_path: "secret".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_vault_read_returns_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app/db"))
        .and(header("X-Vault-Token", "test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(kv2_response(json!({"server": "db.internal", "port": 5432}))),
        )
        .mount(&server)
        .await;

    let value = store_for(&server).get_secret_value("app/db").await.unwrap();
    let text = value.secret_string.expect("text payload");
    assert_eq!(text.expose_secret(), r#"{"server":"db.internal","port":5432}"#);
}

#[tokio::test]
async fn test_vault_missing_secret_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let err = store_for(&server).get_secret_value("app/missing").await.unwrap_err();
    assert!(matches!(err, ConfigSecretsError::SecretNotFound { ref secret_id } if secret_id == "app/missing"));
}

#[tokio::test]
async fn test_vault_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"errors": ["Vault is sealed"]})))
        .mount(&server)
        .await;

    let err = store_for(&server).get_secret_value("app/db").await.unwrap_err();
    assert!(matches!(err, ConfigSecretsError::StoreUnavailable { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_provider_over_vault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/billing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(kv2_response(json!({"api": {"key": "k-1", "enabled": true}}))),
        )
        .mount(&server)
        .await;

    let tree = ConfigTree::from_pairs(":", [("services:billing:AwsSecret", "billing")]);
    let mut provider = SecretsConfigProvider::with_store(
        tree,
        Arc::new(store_for(&server)),
        &ProviderSettings::default(),
    )
    .unwrap();
    provider.load().await.unwrap();

    assert_eq!(
        provider.iter().collect::<Vec<_>>(),
        vec![("services:billing:api:key", "k-1"), ("services:billing:api:enabled", "true")]
    );
}
