//! Vault secret store
//!
//! Fetches secrets from the HashiCorp Vault KV v2 engine. The marker value is
//! the secret path inside the KV mount; the secret's data map is handed on as
//! a JSON text payload with its field order intact.

use crate::errors::{ConfigSecretsError, Result};
use crate::secrets::store::{SecretStore, SecretStoreType};
use crate::secrets::types::{SecretString, SecretValue};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

/// Configuration for the Vault store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultStoreConfig {
    /// Vault server address
    pub address: String,
    /// Vault authentication token
    pub token: Option<SecretString>,
    /// Vault namespace (for Enterprise)
    pub namespace: Option<String>,
    /// KV v2 mount path (default: "secret")
    #[serde(default = "default_kv_mount")]
    pub kv_mount_path: String,
}

fn default_kv_mount() -> String {
    "secret".to_string()
}

impl VaultStoreConfig {
    /// Load configuration from environment variables
    ///
    /// Uses:
    /// - `CONFIG_SECRETS_VAULT_ADDR` or `VAULT_ADDR`
    /// - `CONFIG_SECRETS_VAULT_TOKEN` or `VAULT_TOKEN`
    /// - `CONFIG_SECRETS_VAULT_NAMESPACE` or `VAULT_NAMESPACE`
    /// - `CONFIG_SECRETS_VAULT_KV_MOUNT` (default: "secret")
    ///
    /// Returns `None` when no address is configured.
    pub fn from_env() -> Option<Self> {
        let address = std::env::var("CONFIG_SECRETS_VAULT_ADDR")
            .or_else(|_| std::env::var("VAULT_ADDR"))
            .ok()?;

        let token = std::env::var("CONFIG_SECRETS_VAULT_TOKEN")
            .or_else(|_| std::env::var("VAULT_TOKEN"))
            .ok()
            .map(SecretString::new);

        let namespace = std::env::var("CONFIG_SECRETS_VAULT_NAMESPACE")
            .or_else(|_| std::env::var("VAULT_NAMESPACE"))
            .ok();

        let kv_mount_path =
            std::env::var("CONFIG_SECRETS_VAULT_KV_MOUNT").unwrap_or_else(|_| default_kv_mount());

        Some(Self { address, token, namespace, kv_mount_path })
    }
}

/// HashiCorp Vault secret store
pub struct VaultSecretStore {
    client: VaultClient,
    kv_mount_path: String,
}

impl std::fmt::Debug for VaultSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretStore")
            .field("kv_mount_path", &self.kv_mount_path)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultSecretStore {
    /// Create a new Vault store with the given configuration
    pub fn new(config: VaultStoreConfig) -> Result<Self> {
        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(&config.address);

        if let Some(ref token) = config.token {
            settings_builder.token(token.expose_secret());
        }

        if let Some(ref namespace) = config.namespace {
            settings_builder.namespace(Some(namespace.clone()));
        }

        let settings = settings_builder.build().map_err(|e| {
            ConfigSecretsError::config(format!("Invalid Vault store configuration: {}", e))
        })?;

        let client = VaultClient::new(settings).map_err(|e| {
            ConfigSecretsError::config(format!("Failed to create Vault client: {}", e))
        })?;

        info!(address = %config.address, kv_mount = %config.kv_mount_path, "Initialized Vault secret store");

        Ok(Self { client, kv_mount_path: config.kv_mount_path })
    }
}

/// Map a Vault client failure onto the store error taxonomy.
fn map_vault_error(secret_id: &str, error: ClientError) -> ConfigSecretsError {
    match error {
        ClientError::APIError { code: 404, .. } => ConfigSecretsError::secret_not_found(secret_id),
        other => ConfigSecretsError::store_unavailable(SecretStoreType::Vault.as_str(), other.to_string()),
    }
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        debug!(secret_id = %secret_id, kv_mount = %self.kv_mount_path, "Fetching secret from Vault");

        let data: serde_json::Map<String, serde_json::Value> =
            kv2::read(&self.client, &self.kv_mount_path, secret_id).await.map_err(|e| {
                error!(secret_id = %secret_id, error = %e, "Failed to fetch secret from Vault");
                map_vault_error(secret_id, e)
            })?;

        Ok(SecretValue::text(serde_json::Value::Object(data).to_string()))
    }

    fn store_type(&self) -> SecretStoreType {
        SecretStoreType::Vault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_store_config_default_mount() {
        let config: VaultStoreConfig =
            serde_json::from_str(r#"{"address": "http://localhost:8200", "token": null, "namespace": null}"#)
                .unwrap();
        assert_eq!(config.kv_mount_path, "secret");
    }

    #[test]
    fn test_vault_store_config_redacts_token() {
        let config = VaultStoreConfig {
            address: "http://localhost:8200".to_string(),
            token: Some(SecretString::new("s.root-token")),
            namespace: None,
            kv_mount_path: default_kv_mount(),
        };

        assert!(!format!("{:?}", config).contains("s.root-token"));
        assert!(!serde_json::to_string(&config).unwrap().contains("s.root-token"));
    }

    #[test]
    fn test_new_store_does_not_connect() {
        let store = VaultSecretStore::new(VaultStoreConfig {
            address: "http://127.0.0.1:8200".to_string(),
            token: Some(SecretString::new("token")),
            namespace: None,
            kv_mount_path: "kv".to_string(),
        })
        .unwrap();

        assert_eq!(store.store_type(), SecretStoreType::Vault);
        assert!(format!("{:?}", store).contains("kv"));
    }

    #[test]
    fn test_map_vault_error() {
        let not_found = map_vault_error("app/db", ClientError::APIError { code: 404, errors: vec![] });
        assert!(matches!(not_found, ConfigSecretsError::SecretNotFound { .. }));

        let forbidden = map_vault_error(
            "app/db",
            ClientError::APIError { code: 403, errors: vec!["permission denied".to_string()] },
        );
        assert!(matches!(forbidden, ConfigSecretsError::StoreUnavailable { .. }));
    }
}
