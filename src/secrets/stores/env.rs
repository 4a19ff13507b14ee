//! Environment variable secret store.
//!
//! Reads secret payloads from environment variables with the
//! `CONFIG_SECRETS_SECRET_` prefix. Intended for **development and testing
//! only**: environment variables are visible in process listings and have no
//! encryption, audit or versioning.
//!
//! # Usage
//!
//! ```bash
//! export CONFIG_SECRETS_SECRET_DB_CREDENTIALS='{"user":"app","password":"hunter2"}'
//! ```
//!
//! A marker `AwsSecret = "db-credentials"` then resolves against
//! `CONFIG_SECRETS_SECRET_DB_CREDENTIALS`.

use async_trait::async_trait;
use std::env;

use crate::errors::{ConfigSecretsError, Result};
use crate::secrets::store::{SecretStore, SecretStoreType};
use crate::secrets::types::SecretValue;

/// Environment variable prefix for secrets.
pub const SECRET_PREFIX: &str = "CONFIG_SECRETS_SECRET_";

/// Environment variable secret store (development only).
///
/// Every payload is returned as text.
#[derive(Debug, Clone)]
pub struct EnvVarSecretStore {
    prefix: String,
}

impl Default for EnvVarSecretStore {
    fn default() -> Self {
        Self { prefix: SECRET_PREFIX.to_string() }
    }
}

impl EnvVarSecretStore {
    /// Creates a store reading `CONFIG_SECRETS_SECRET_*` variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store reading variables with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Converts a secret identifier to the environment variable name.
    ///
    /// The identifier is upper-cased and anything that is not an ASCII
    /// alphanumeric becomes `_`, so `db-credentials` and `db/credentials`
    /// both read `CONFIG_SECRETS_SECRET_DB_CREDENTIALS`.
    pub fn env_var_name(&self, secret_id: &str) -> String {
        let suffix: String = secret_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

#[async_trait]
impl SecretStore for EnvVarSecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        let env_var = self.env_var_name(secret_id);

        match env::var(&env_var) {
            Ok(value) => Ok(SecretValue::text(value)),
            Err(env::VarError::NotPresent) => Err(ConfigSecretsError::secret_not_found(secret_id)),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigSecretsError::store_unavailable(
                SecretStoreType::Env.as_str(),
                format!("{} is not valid unicode", env_var),
            )),
        }
    }

    fn store_type(&self) -> SecretStoreType {
        SecretStoreType::Env
    }
}
