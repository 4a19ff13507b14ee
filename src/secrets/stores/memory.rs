//! In-memory secret store
//!
//! Map-backed [`SecretStore`] for tests and local development. It is the
//! substitute the fetcher takes in place of a remote client.

use crate::errors::{ConfigSecretsError, Result};
use crate::secrets::store::{SecretStore, SecretStoreType};
use crate::secrets::types::SecretValue;
use async_trait::async_trait;
use std::collections::HashMap;

/// Secret store backed by a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    secrets: HashMap<String, SecretValue>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, builder style.
    pub fn with_secret(mut self, secret_id: impl Into<String>, value: SecretValue) -> Self {
        self.insert(secret_id, value);
        self
    }

    /// Add a secret whose text payload is the serialized form of `value`.
    pub fn with_json(self, secret_id: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with_secret(secret_id, SecretValue::text(value.to_string()))
    }

    /// Insert or replace a secret.
    pub fn insert(&mut self, secret_id: impl Into<String>, value: SecretValue) {
        self.secrets.insert(secret_id.into(), value);
    }

    /// Number of secrets held.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Returns true if the store holds no secrets.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| ConfigSecretsError::secret_not_found(secret_id))
    }

    fn store_type(&self) -> SecretStoreType {
        SecretStoreType::InMemory
    }
}
