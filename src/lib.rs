//! # config-secrets
//!
//! Resolves secret-store markers in a hierarchical configuration into flat
//! configuration overrides.
//!
//! A configuration tree may contain entries such as
//!
//! ```text
//! database:AwsSecret = "prod/db-credentials"
//! ```
//!
//! On load, every entry whose key matches the marker key (ignoring case) is
//! looked up in the secret store. The secret's JSON payload is flattened
//! beneath the section that owns the marker, so
//! `{"server":"db.internal","port":5432}` becomes `database:server` and
//! `database:port`, readable like any other setting.
//!
//! ## Architecture
//!
//! ```text
//! ConfigTree ──► Resolver ──► SecretFetcher ──► SecretStore (env | vault | aws | memory)
//!                   │
//!                   └──► Flattener ──► OverrideStore ──► config::Config
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use config_secrets::{Result, SecretsConfigProvider, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::from_env()?;
//!     config_secrets::init_logging(&settings.logging);
//!
//!     let base = config::Config::builder()
//!         .add_source(config::File::with_name("settings"))
//!         .build()?;
//!
//!     let mut provider = SecretsConfigProvider::from_settings(&base, &settings).await?;
//!     provider.load().await?;
//!
//!     let config = provider.merge_into(base)?;
//!     println!("{}", config.get_string("database.server")?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod flatten;
pub mod observability;
pub mod provider;
pub mod resolver;
pub mod secrets;
pub mod tree;

// Re-export commonly used types and traits
pub use crate::config::{LoggingConfig, ProviderSettings, Settings};
pub use errors::{ConfigSecretsError, Result};
pub use flatten::{flatten, flatten_with_delimiter, FlattenedOverride};
pub use observability::init_logging;
pub use provider::{OverrideStore, SecretsConfigProvider};
pub use resolver::{find_markers, SecretMarker, SecretResolver};
pub use secrets::{SecretFetcher, SecretStore, SecretStoreType, SecretString, SecretValue};
pub use tree::{ConfigSection, ConfigTree};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
