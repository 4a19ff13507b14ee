//! # Configuration Settings
//!
//! Settings for the secrets provider itself: which key marks a secret, how
//! paths are joined, which store to use, and how to log.

use crate::errors::{ConfigSecretsError, Result};
use crate::secrets::{AwsStoreConfig, SecretStoreType, VaultStoreConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Marker key used when none is configured
pub const DEFAULT_MARKER_KEY: &str = "AwsSecret";

/// Path separator used when none is configured
pub const DEFAULT_KEY_DELIMITER: &str = ":";

/// Main settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct Settings {
    /// Provider behaviour
    #[validate(nested)]
    pub provider: ProviderSettings,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingConfig,

    /// Vault store configuration, when a Vault address is known
    pub vault: Option<VaultStoreConfig>,

    /// AWS store overrides
    pub aws: Option<AwsStoreConfig>,
}

impl Settings {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(ConfigSecretsError::from)?;

        self.validate_custom()?;

        Ok(())
    }

    /// Cross-field checks the validator crate cannot express
    fn validate_custom(&self) -> Result<()> {
        self.provider.validate_custom()?;

        if self.provider.store == SecretStoreType::Vault && self.vault.is_none() {
            return Err(ConfigSecretsError::validation_field(
                "Vault store selected but no Vault configuration is present",
                "vault",
            ));
        }

        Ok(())
    }

    /// Create settings from environment variables
    ///
    /// Uses:
    /// - `CONFIG_SECRETS_MARKER_KEY` (default: "AwsSecret")
    /// - `CONFIG_SECRETS_KEY_DELIMITER` (default: ":")
    /// - `CONFIG_SECRETS_STORE` (default: "env")
    /// - `CONFIG_SECRETS_FETCH_TIMEOUT_SECONDS` (default: 30, 0 = no deadline)
    /// - `CONFIG_SECRETS_LOG_LEVEL` (default: "info")
    /// - `CONFIG_SECRETS_LOG_JSON` (default: false)
    /// - Vault and AWS variables, see [`VaultStoreConfig::from_env`] and
    ///   [`AwsStoreConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let settings = Self {
            provider: ProviderSettings::from_env()?,
            logging: LoggingConfig::from_env(),
            vault: VaultStoreConfig::from_env(),
            aws: Some(AwsStoreConfig::from_env()),
        };

        settings.validate()?;
        Ok(settings)
    }
}

/// Provider behaviour, fixed at provider construction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProviderSettings {
    /// Key that marks a secret reference, matched case-insensitively
    #[validate(length(min = 1, message = "Marker key cannot be empty"))]
    pub marker_key: String,

    /// Separator between path segments
    #[validate(length(min = 1, message = "Key delimiter cannot be empty"))]
    pub key_delimiter: String,

    /// Store the marker values are resolved against
    pub store: SecretStoreType,

    /// Deadline for a single store call in seconds (0 = no deadline)
    #[validate(range(max = 300, message = "Fetch timeout must be at most 300 seconds"))]
    pub fetch_timeout_seconds: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            marker_key: DEFAULT_MARKER_KEY.to_string(),
            key_delimiter: DEFAULT_KEY_DELIMITER.to_string(),
            store: SecretStoreType::default(),
            fetch_timeout_seconds: 30,
        }
    }
}

impl ProviderSettings {
    /// Settings with a custom marker key and defaults otherwise
    pub fn with_marker_key(marker_key: impl Into<String>) -> Self {
        Self { marker_key: marker_key.into(), ..Default::default() }
    }

    /// Validate marker key, delimiter and deadline
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(ConfigSecretsError::from)?;

        self.validate_custom()
    }

    fn validate_custom(&self) -> Result<()> {
        if self.marker_key.contains(self.key_delimiter.as_str()) {
            return Err(ConfigSecretsError::validation_field(
                "Marker key cannot contain the key delimiter",
                "marker_key",
            ));
        }

        if self.marker_key.trim() != self.marker_key {
            return Err(ConfigSecretsError::validation_field(
                "Marker key cannot have leading or trailing whitespace",
                "marker_key",
            ));
        }

        Ok(())
    }

    /// Get the fetch deadline as Duration (None if 0)
    pub fn fetch_timeout(&self) -> Option<Duration> {
        if self.fetch_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.fetch_timeout_seconds))
        }
    }

    /// Create ProviderSettings from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let marker_key =
            std::env::var("CONFIG_SECRETS_MARKER_KEY").unwrap_or(defaults.marker_key);

        let key_delimiter =
            std::env::var("CONFIG_SECRETS_KEY_DELIMITER").unwrap_or(defaults.key_delimiter);

        let store = match std::env::var("CONFIG_SECRETS_STORE") {
            Ok(value) => value.parse::<SecretStoreType>().map_err(ConfigSecretsError::config)?,
            Err(_) => defaults.store,
        };

        let fetch_timeout_seconds = match std::env::var("CONFIG_SECRETS_FETCH_TIMEOUT_SECONDS") {
            Ok(value) => value.parse::<u64>().map_err(|e| {
                ConfigSecretsError::config(format!("Invalid fetch timeout: {}", e))
            })?,
            Err(_) => defaults.fetch_timeout_seconds,
        };

        Ok(Self { marker_key, key_delimiter, store, fetch_timeout_seconds })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl LoggingConfig {
    /// Create LoggingConfig from environment variables
    pub fn from_env() -> Self {
        let log_level =
            std::env::var("CONFIG_SECRETS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let json_logging = std::env::var("CONFIG_SECRETS_LOG_JSON")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Self { log_level, json_logging }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validation() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.provider.marker_key, "AwsSecret");
        assert_eq!(settings.provider.key_delimiter, ":");
        assert_eq!(settings.provider.store, SecretStoreType::Env);
    }

    #[test]
    fn test_fetch_timeout() {
        let provider = ProviderSettings { fetch_timeout_seconds: 5, ..Default::default() };
        assert_eq!(provider.fetch_timeout(), Some(Duration::from_secs(5)));

        let no_deadline = ProviderSettings { fetch_timeout_seconds: 0, ..Default::default() };
        assert_eq!(no_deadline.fetch_timeout(), None);
    }

    #[test]
    fn test_settings_validation_errors() {
        let mut settings = Settings::default();
        settings.provider.marker_key = String::new();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.provider.key_delimiter = String::new();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.provider.marker_key = "Aws:Secret".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.provider.marker_key = " AwsSecret".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.provider.fetch_timeout_seconds = 301;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_vault_store_needs_vault_settings() {
        let mut settings = Settings::default();
        settings.provider.store = SecretStoreType::Vault;

        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigSecretsError::Validation { field: Some(ref f), .. } if f == "vault"));
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: Settings =
            serde_json::from_str(r#"{"provider": {"marker_key": "VaultSecret", "store": "vault"}}"#)
                .unwrap();

        assert_eq!(settings.provider.marker_key, "VaultSecret");
        assert_eq!(settings.provider.store, SecretStoreType::Vault);
        assert_eq!(settings.provider.key_delimiter, ":");
        assert_eq!(settings.logging.log_level, "info");
    }

    #[test]
    fn test_provider_settings_validate_alone() {
        assert!(ProviderSettings::default().validate().is_ok());

        let empty_delimiter = ProviderSettings { key_delimiter: String::new(), ..Default::default() };
        let err = empty_delimiter.validate().unwrap_err();
        assert!(matches!(err, ConfigSecretsError::Validation { .. }));

        let clash = ProviderSettings { key_delimiter: "Secret".to_string(), ..Default::default() };
        assert!(clash.validate().is_err());
    }

    #[test]
    fn test_with_marker_key() {
        let provider = ProviderSettings::with_marker_key("VaultRef");
        assert_eq!(provider.marker_key, "VaultRef");
        assert_eq!(provider.fetch_timeout_seconds, 30);
    }
}
