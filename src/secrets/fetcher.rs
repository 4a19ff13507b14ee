//! Secret fetcher
//!
//! Turns a store answer into the single string the flattener consumes: the
//! text payload as-is, or the standard base64 encoding of a binary payload.
//! One store call per fetch; no retries, no caching.

use super::store::SecretStore;
use super::types::SecretString;
use crate::errors::{ConfigSecretsError, Result};
use base64::Engine;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches secret payloads from an injected [`SecretStore`].
#[derive(Debug, Clone)]
pub struct SecretFetcher {
    store: Arc<dyn SecretStore>,
    timeout: Option<Duration>,
}

impl SecretFetcher {
    /// Create a fetcher without a deadline on store calls
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store, timeout: None }
    }

    /// Bound every store call by `timeout`. An expired call is reported as
    /// [`ConfigSecretsError::StoreUnavailable`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The store behind this fetcher
    pub fn store(&self) -> &Arc<dyn SecretStore> {
        &self.store
    }

    /// Fetch the payload of `secret_id` as a string.
    pub async fn fetch(&self, secret_id: &str) -> Result<SecretString> {
        let store_type = self.store.store_type();
        debug!(secret_id = %secret_id, store = %store_type, "Fetching secret");

        let value = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.store.get_secret_value(secret_id))
                .await
                .map_err(|_| {
                    warn!(secret_id = %secret_id, store = %store_type, timeout_ms = limit.as_millis() as u64, "Secret fetch timed out");
                    ConfigSecretsError::store_unavailable(
                        store_type.as_str(),
                        format!("fetching '{}' timed out after {}ms", secret_id, limit.as_millis()),
                    )
                })??,
            None => self.store.get_secret_value(secret_id).await?,
        };

        if let Some(text) = value.secret_string {
            return Ok(text);
        }

        match value.secret_binary {
            Some(bytes) => {
                debug!(secret_id = %secret_id, bytes = bytes.len(), "Secret has binary payload, base64 encoding");
                Ok(SecretString::new(base64::engine::general_purpose::STANDARD.encode(bytes)))
            }
            None => {
                warn!(secret_id = %secret_id, store = %store_type, "Secret has no payload");
                Err(ConfigSecretsError::secret_payload(secret_id))
            }
        }
    }
}
