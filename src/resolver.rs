//! # Config Tree Resolver
//!
//! Finds secret markers anywhere in a configuration tree and turns each one
//! into flattened overrides rooted at the section that owns the marker.
//!
//! Resolution runs in two phases. [`find_markers`] walks the tree pre-order
//! in sibling order and validates every marker before any store is called.
//! [`SecretResolver::resolve`] then fetches and flattens the markers one at
//! a time in that same order, so the first failure aborts the whole pass.

use crate::config::ProviderSettings;
use crate::errors::{ConfigSecretsError, Result};
use crate::flatten::{flatten_with_delimiter, FlattenedOverride};
use crate::secrets::SecretFetcher;
use crate::tree::ConfigSection;
use tracing::{debug, info};

/// A marker found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretMarker {
    /// Path of the section owning the marker; flattened paths start here
    pub parent_path: String,
    /// Path of the marker entry itself
    pub marker_path: String,
    /// Identifier to look up in the secret store
    pub secret_id: String,
}

/// Collect every marker under `tree`.
///
/// A child whose key equals `marker_key` ignoring case is a marker; its own
/// children are not searched. Every other child is searched recursively.
///
/// # Errors
///
/// [`ConfigSecretsError::InvalidMarker`] if a marker has no value or a blank one.
pub fn find_markers<T: ConfigSection>(tree: &T, marker_key: &str) -> Result<Vec<SecretMarker>> {
    let marker_key = marker_key.to_lowercase();
    let mut markers = Vec::new();
    collect_markers(tree, &marker_key, &mut markers)?;
    Ok(markers)
}

fn collect_markers<T: ConfigSection>(
    section: &T,
    marker_key: &str,
    markers: &mut Vec<SecretMarker>,
) -> Result<()> {
    for child in section.children() {
        if child.key().to_lowercase() != marker_key {
            collect_markers(child, marker_key, markers)?;
            continue;
        }

        let secret_id = match child.value().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            Some(_) => {
                return Err(ConfigSecretsError::invalid_marker(child.path(), "secret id is blank"))
            }
            None => {
                return Err(ConfigSecretsError::invalid_marker(child.path(), "secret id is missing"))
            }
        };

        debug!(path = %child.path(), secret_id = %secret_id, "Found secret marker");
        markers.push(SecretMarker {
            parent_path: section.path().to_string(),
            marker_path: child.path().to_string(),
            secret_id,
        });
    }

    Ok(())
}

/// Resolves markers against a secret store.
#[derive(Debug, Clone)]
pub struct SecretResolver {
    fetcher: SecretFetcher,
    marker_key: String,
    key_delimiter: String,
}

impl SecretResolver {
    pub fn new(
        fetcher: SecretFetcher,
        marker_key: impl Into<String>,
        key_delimiter: impl Into<String>,
    ) -> Self {
        Self { fetcher, marker_key: marker_key.into(), key_delimiter: key_delimiter.into() }
    }

    /// Resolver using the marker key and delimiter from `settings`.
    pub fn from_settings(fetcher: SecretFetcher, settings: &ProviderSettings) -> Self {
        Self::new(fetcher, &settings.marker_key, &settings.key_delimiter)
    }

    pub fn marker_key(&self) -> &str {
        &self.marker_key
    }

    pub fn key_delimiter(&self) -> &str {
        &self.key_delimiter
    }

    pub fn fetcher(&self) -> &SecretFetcher {
        &self.fetcher
    }

    /// Markers under `tree` for this resolver's marker key.
    pub fn find_markers<T: ConfigSection>(&self, tree: &T) -> Result<Vec<SecretMarker>> {
        find_markers(tree, &self.marker_key)
    }

    /// Resolve every marker in `tree` into overrides, in traversal order.
    ///
    /// Duplicate paths are kept; the consumer applies them last-write-wins.
    pub async fn resolve<T: ConfigSection + Sync>(&self, tree: &T) -> Result<Vec<FlattenedOverride>> {
        let markers = self.find_markers(tree)?;
        self.resolve_markers(&markers).await
    }

    /// Fetch and flatten already collected markers, one at a time.
    pub async fn resolve_markers(&self, markers: &[SecretMarker]) -> Result<Vec<FlattenedOverride>> {
        let mut overrides = Vec::new();

        for marker in markers {
            let payload = self.fetcher.fetch(&marker.secret_id).await?;
            let flattened = flatten_with_delimiter(
                &marker.parent_path,
                payload.expose_secret(),
                &self.key_delimiter,
            )?;

            debug!(
                secret_id = %marker.secret_id,
                path = %marker.parent_path,
                overrides = flattened.len(),
                "Resolved secret marker"
            );
            overrides.extend(flattened);
        }

        info!(markers = markers.len(), overrides = overrides.len(), "Secret markers resolved");
        Ok(overrides)
    }
}
