//! Secret store trait and types
//!
//! Defines the capability the resolver consumes: fetch one secret payload by
//! identifier. Concrete clients live in [`super::stores`].

use super::types::SecretValue;
use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of secret store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecretStoreType {
    /// `CONFIG_SECRETS_SECRET_*` environment variables
    #[default]
    Env,
    /// HashiCorp Vault KV v2
    Vault,
    /// AWS Secrets Manager
    AwsSecretsManager,
    /// Process-local map, for tests and local development
    InMemory,
}

impl SecretStoreType {
    /// Get the settings representation of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Vault => "vault",
            Self::AwsSecretsManager => "aws_secrets_manager",
            Self::InMemory => "in_memory",
        }
    }
}

impl FromStr for SecretStoreType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "env" => Ok(Self::Env),
            "vault" => Ok(Self::Vault),
            "aws_secrets_manager" => Ok(Self::AwsSecretsManager),
            "in_memory" => Ok(Self::InMemory),
            _ => Err(format!("Unknown secret store type: {}", s)),
        }
    }
}

impl fmt::Display for SecretStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for secret stores
///
/// Implementations must be Send + Sync for use in async contexts and MUST NOT
/// log secret values.
#[async_trait]
pub trait SecretStore: Send + Sync + std::fmt::Debug {
    /// Fetch the raw payload stored under `secret_id`.
    ///
    /// # Errors
    ///
    /// - [`ConfigSecretsError::SecretNotFound`] if the store has no such secret
    /// - [`ConfigSecretsError::StoreUnavailable`] if the call itself failed
    ///
    /// [`ConfigSecretsError::SecretNotFound`]: crate::errors::ConfigSecretsError::SecretNotFound
    /// [`ConfigSecretsError::StoreUnavailable`]: crate::errors::ConfigSecretsError::StoreUnavailable
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue>;

    /// Get the store type identifier
    fn store_type(&self) -> SecretStoreType;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_roundtrip() {
        for st in [
            SecretStoreType::Env,
            SecretStoreType::Vault,
            SecretStoreType::AwsSecretsManager,
            SecretStoreType::InMemory,
        ] {
            let parsed: SecretStoreType = st.as_str().parse().unwrap();
            assert_eq!(st, parsed);
        }
    }

    #[test]
    fn test_store_type_display() {
        assert_eq!(SecretStoreType::Vault.to_string(), "vault");
        assert_eq!(SecretStoreType::AwsSecretsManager.to_string(), "aws_secrets_manager");
    }

    #[test]
    fn test_store_type_rejects_unknown() {
        let err = "gcp_secret_manager".parse::<SecretStoreType>().unwrap_err();
        assert!(err.contains("gcp_secret_manager"));
    }

    #[test]
    fn test_store_type_serialization() {
        let json = serde_json::to_string(&SecretStoreType::AwsSecretsManager).unwrap();
        assert_eq!(json, "\"aws_secrets_manager\"");

        let parsed: SecretStoreType = serde_json::from_str("\"in_memory\"").unwrap();
        assert_eq!(parsed, SecretStoreType::InMemory);
        assert_eq!(SecretStoreType::default(), SecretStoreType::Env);
    }
}
