//! Concrete secret stores
//!
//! - **Env**: `CONFIG_SECRETS_SECRET_*` variables, development only
//! - **InMemory**: process-local map, tests and local development
//! - **Vault**: HashiCorp Vault KV v2 engine
//! - **AWS Secrets Manager**: (Optional `aws` feature)

pub mod aws;
pub mod env;
pub mod memory;
pub mod vault;

pub use aws::AwsStoreConfig;
#[cfg(feature = "aws")]
pub use aws::AwsSecretsManagerStore;
pub use env::EnvVarSecretStore;
pub use memory::InMemorySecretStore;
pub use vault::{VaultSecretStore, VaultStoreConfig};

use super::store::{SecretStore, SecretStoreType};
use crate::config::Settings;
use crate::errors::{ConfigSecretsError, Result};
use std::sync::Arc;
use tracing::info;

/// Build the store selected by `settings.provider.store`.
///
/// The in-memory store has nothing to read from settings and comes back
/// empty; callers that want it populated construct it directly.
pub async fn build_store(settings: &Settings) -> Result<Arc<dyn SecretStore>> {
    let store_type = settings.provider.store;
    info!(store = %store_type, "Building secret store");

    match store_type {
        SecretStoreType::Env => Ok(Arc::new(EnvVarSecretStore::new())),
        SecretStoreType::InMemory => Ok(Arc::new(InMemorySecretStore::new())),
        SecretStoreType::Vault => {
            let config = settings.vault.clone().ok_or_else(|| {
                ConfigSecretsError::config(
                    "Vault store selected but no Vault address is configured (CONFIG_SECRETS_VAULT_ADDR)",
                )
            })?;
            Ok(Arc::new(VaultSecretStore::new(config)?))
        }
        #[cfg(feature = "aws")]
        SecretStoreType::AwsSecretsManager => {
            let config = settings.aws.clone().unwrap_or_default();
            Ok(Arc::new(AwsSecretsManagerStore::new(&config).await))
        }
        #[cfg(not(feature = "aws"))]
        SecretStoreType::AwsSecretsManager => Err(ConfigSecretsError::config(
            "AWS Secrets Manager store requires the `aws` feature",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_env_store_by_default() {
        let store = build_store(&Settings::default()).await.unwrap();
        assert_eq!(store.store_type(), SecretStoreType::Env);
    }

    #[tokio::test]
    async fn test_build_vault_store_requires_address() {
        let mut settings = Settings::default();
        settings.provider.store = SecretStoreType::Vault;

        let err = build_store(&settings).await.unwrap_err();
        assert!(matches!(err, ConfigSecretsError::Config { .. }));
    }

    #[tokio::test]
    async fn test_build_vault_store() {
        let mut settings = Settings::default();
        settings.provider.store = SecretStoreType::Vault;
        settings.vault = Some(VaultStoreConfig {
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            namespace: None,
            kv_mount_path: "secret".to_string(),
        });

        let store = build_store(&settings).await.unwrap();
        assert_eq!(store.store_type(), SecretStoreType::Vault);
    }

    #[cfg(not(feature = "aws"))]
    #[tokio::test]
    async fn test_build_aws_store_without_feature() {
        let mut settings = Settings::default();
        settings.provider.store = SecretStoreType::AwsSecretsManager;

        assert!(build_store(&settings).await.is_err());
    }
}
