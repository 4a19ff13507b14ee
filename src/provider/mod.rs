//! # Secrets Configuration Provider
//!
//! Owns a snapshot of the configuration tree, the secret fetcher and the
//! backing store of resolved overrides.
//!
//! A [`load`](SecretsConfigProvider::load) clears the backing store, resolves
//! every marker in the tree and inserts the overrides in traversal order, so
//! later duplicates win. If anything fails the store is left empty; it is
//! never partially populated from a failed load. `load` takes `&mut self`,
//! so loads cannot overlap and readers never see a half-applied load.
//!
//! ```rust,ignore
//! use config_secrets::{ProviderSettings, SecretsConfigProvider};
//!
//! let base = config::Config::builder()
//!     .add_source(config::File::with_name("settings"))
//!     .build()?;
//!
//! let mut provider = SecretsConfigProvider::from_config(&base, store, &ProviderSettings::default())?;
//! provider.load().await?;
//!
//! let config = provider.merge_into(base)?;
//! let host: String = config.get_string("database.server")?;
//! ```

mod merge;
pub mod store;

pub use store::OverrideStore;

use crate::config::{ProviderSettings, Settings};
use crate::errors::Result;
use crate::load_span;
use crate::observability::log_settings_info;
use crate::resolver::SecretResolver;
use crate::secrets::{build_store, SecretFetcher, SecretStore};
use crate::tree::{ConfigSection, ConfigTree};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// Configuration provider backed by a secret store.
#[derive(Debug)]
pub struct SecretsConfigProvider<T: ConfigSection = ConfigTree> {
    tree: T,
    resolver: SecretResolver,
    data: OverrideStore,
}

impl<T: ConfigSection + Sync> SecretsConfigProvider<T> {
    /// Create a provider over `tree` with an explicit fetcher.
    ///
    /// # Errors
    ///
    /// [`ConfigSecretsError::Validation`](crate::ConfigSecretsError::Validation)
    /// if `settings` has an empty marker key or delimiter, or a marker key
    /// that contains the delimiter.
    pub fn new(tree: T, fetcher: SecretFetcher, settings: &ProviderSettings) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            tree,
            resolver: SecretResolver::from_settings(fetcher, settings),
            data: OverrideStore::new(),
        })
    }

    /// Create a provider over `tree` reading from `store`, applying the
    /// configured fetch deadline.
    pub fn with_store(
        tree: T,
        store: Arc<dyn SecretStore>,
        settings: &ProviderSettings,
    ) -> Result<Self> {
        let fetcher = match settings.fetch_timeout() {
            Some(timeout) => SecretFetcher::new(store).with_timeout(timeout),
            None => SecretFetcher::new(store),
        };
        Self::new(tree, fetcher, settings)
    }

    /// Clear the backing store and repopulate it from the secret store.
    pub async fn load(&mut self) -> Result<()> {
        let span = load_span!(self.resolver.marker_key(), store = %self.resolver.fetcher().store().store_type());

        async {
            self.data.clear();

            let resolved = match self.resolver.find_markers(&self.tree) {
                Ok(markers) => {
                    tracing::Span::current().record("markers", markers.len());
                    self.resolver.resolve_markers(&markers).await
                }
                Err(e) => Err(e),
            };

            let overrides = match resolved {
                Ok(overrides) => overrides,
                Err(e) => {
                    warn!(error = %e, "Secrets load failed, backing store left empty");
                    return Err(e);
                }
            };

            self.data.extend(overrides);

            tracing::Span::current().record("overrides", self.data.len());
            info!(overrides = self.data.len(), "Secrets loaded");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Resolved value at `path`, matched ignoring case.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.data.get(path)
    }

    /// Resolved `(path, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The backing store.
    pub fn data(&self) -> &OverrideStore {
        &self.data
    }

    /// The tree snapshot markers are read from.
    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn marker_key(&self) -> &str {
        self.resolver.marker_key()
    }

    pub fn key_delimiter(&self) -> &str {
        self.resolver.key_delimiter()
    }

    /// Layer the resolved overrides on top of `base`.
    ///
    /// Each override path is split on the key delimiter and written into
    /// the base tree, so values are read through the usual `config`
    /// accessors. Numeric segments index into arrays the base already holds;
    /// the other elements of those arrays are kept.
    ///
    /// # Errors
    ///
    /// [`ConfigSecretsError::Config`](crate::ConfigSecretsError::Config) if an
    /// override path has a segment `config` cannot address, such as a secret
    /// key containing `.`.
    pub fn merge_into(&self, base: config::Config) -> Result<config::Config> {
        merge::merge_overrides(base, self.data.iter(), self.key_delimiter())
    }
}

impl SecretsConfigProvider<ConfigTree> {
    /// Snapshot a loaded [`config::Config`] and resolve its markers against
    /// `store`.
    pub fn from_config(
        config: &config::Config,
        store: Arc<dyn SecretStore>,
        settings: &ProviderSettings,
    ) -> Result<Self> {
        let tree = ConfigTree::from_config(&settings.key_delimiter, config)?;
        Self::with_store(tree, store, settings)
    }

    /// Like [`from_config`](Self::from_config) with the store built from
    /// `settings`.
    pub async fn from_settings(config: &config::Config, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        log_settings_info(settings);
        let store = build_store(settings).await?;
        Self::from_config(config, store, &settings.provider)
    }
}
