//! Secret store access.
//!
//! The resolver never talks to a store client directly. It goes through a
//! [`SecretFetcher`], which wraps any [`SecretStore`] handed to it and
//! normalizes the answer to a single string payload.
//!
//! # Supported Stores
//!
//! - **Environment Variables**: Development store using `CONFIG_SECRETS_SECRET_*`
//! - **In-memory**: Test double and local development
//! - **HashiCorp Vault**: KV v2 engine
//! - **AWS Secrets Manager**: (Optional `aws` feature)
//!
//! # Example
//!
//! ```rust,ignore
//! use config_secrets::secrets::{InMemorySecretStore, SecretFetcher, SecretValue};
//! use std::sync::Arc;
//!
//! let store = InMemorySecretStore::new()
//!     .with_secret("db", SecretValue::text(r#"{"user":"app"}"#));
//! let fetcher = SecretFetcher::new(Arc::new(store));
//!
//! let payload = fetcher.fetch("db").await?;
//! ```
//!
//! # Security Considerations
//!
//! - Secret payloads are held in [`SecretString`] until they are flattened
//! - Stores and the fetcher log identifiers, never values

pub mod fetcher;
pub mod store;
pub mod stores;
pub mod types;

pub use fetcher::SecretFetcher;
pub use store::{SecretStore, SecretStoreType};
#[cfg(feature = "aws")]
pub use stores::AwsSecretsManagerStore;
pub use stores::{
    build_store, AwsStoreConfig, EnvVarSecretStore, InMemorySecretStore, VaultSecretStore,
    VaultStoreConfig,
};
pub use types::{SecretString, SecretValue};
