//! AWS Secrets Manager store
//!
//! Fetches secrets with `GetSecretValue`. The marker value is the secret
//! name or ARN. Text payloads are returned as text, binary payloads as bytes
//! (the fetcher base64 encodes them).
//!
//! ## Configuration
//!
//! Environment variables:
//! - `CONFIG_SECRETS_AWS_REGION` - Optional region override (default: SDK resolution chain)
//! - `CONFIG_SECRETS_AWS_ENDPOINT` - Optional endpoint override (e.g. LocalStack)
//!
//! Credentials come from the standard AWS provider chain.

use serde::{Deserialize, Serialize};

#[cfg(feature = "aws")]
use crate::errors::{ConfigSecretsError, Result};
#[cfg(feature = "aws")]
use crate::secrets::store::{SecretStore, SecretStoreType};
#[cfg(feature = "aws")]
use crate::secrets::types::SecretValue;
#[cfg(feature = "aws")]
use async_trait::async_trait;
#[cfg(feature = "aws")]
use aws_sdk_secretsmanager::error::{ProvideErrorMetadata, SdkError};
#[cfg(feature = "aws")]
use tracing::{debug, error, info};

/// Configuration for the AWS Secrets Manager store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsStoreConfig {
    /// Region override
    pub region: Option<String>,
    /// Endpoint override
    pub endpoint_url: Option<String>,
}

impl AwsStoreConfig {
    /// Load configuration from environment variables. Blank values count as unset.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|s| !s.trim().is_empty());

        Self {
            region: read("CONFIG_SECRETS_AWS_REGION"),
            endpoint_url: read("CONFIG_SECRETS_AWS_ENDPOINT"),
        }
    }
}

/// AWS Secrets Manager store
#[cfg(feature = "aws")]
#[derive(Debug, Clone)]
pub struct AwsSecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

#[cfg(feature = "aws")]
impl AwsSecretsManagerStore {
    /// Wrap an already configured client
    pub fn from_client(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    /// Build a client from the shared AWS configuration plus `config` overrides
    pub async fn new(config: &AwsStoreConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = config.region.clone() {
            loader = loader.region(aws_config::Region::new(region));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&shared_config);
        if let Some(endpoint) = config.endpoint_url.as_deref() {
            builder = builder.endpoint_url(endpoint);
        }

        info!(region = ?config.region, endpoint = ?config.endpoint_url, "Initialized AWS Secrets Manager store");

        Self::from_client(aws_sdk_secretsmanager::Client::from_conf(builder.build()))
    }
}

#[cfg(feature = "aws")]
fn is_not_found<T>(err: &SdkError<T>) -> bool
where
    T: ProvideErrorMetadata,
{
    if let SdkError::ServiceError(context) = err {
        return context.err().code() == Some("ResourceNotFoundException");
    }
    false
}

#[cfg(feature = "aws")]
#[async_trait]
impl SecretStore for AwsSecretsManagerStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        debug!(secret_id = %secret_id, "Fetching secret from AWS Secrets Manager");

        match self.client.get_secret_value().secret_id(secret_id).send().await {
            Ok(output) => Ok(SecretValue {
                secret_string: output.secret_string().map(Into::into),
                secret_binary: output.secret_binary().map(|blob| blob.as_ref().to_vec()),
            }),
            Err(err) if is_not_found(&err) => Err(ConfigSecretsError::secret_not_found(secret_id)),
            Err(err) => {
                error!(secret_id = %secret_id, error = %err, "Failed to fetch secret from AWS Secrets Manager");
                Err(ConfigSecretsError::store_unavailable(
                    SecretStoreType::AwsSecretsManager.as_str(),
                    format!("get_secret_value failed: {}", err),
                ))
            }
        }
    }

    fn store_type(&self) -> SecretStoreType {
        SecretStoreType::AwsSecretsManager
    }
}
