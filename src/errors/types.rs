//! # Error Types
//!
//! Error types for secret resolution using `thiserror`.

/// Custom result type for config-secrets operations
pub type Result<T> = std::result::Result<T, ConfigSecretsError>;

/// Main error type for secret resolution
///
/// None of these are recovered inside the crate: any failure during a load
/// aborts that load and surfaces to the caller.
#[derive(thiserror::Error, Debug)]
pub enum ConfigSecretsError {
    /// The secret store has no secret with this identifier
    #[error("Secret not found: {secret_id}")]
    SecretNotFound { secret_id: String },

    /// The secret store could not be reached or rejected the call
    #[error("Secret store '{store}' unavailable: {message}")]
    StoreUnavailable { store: String, message: String },

    /// The store answered but returned neither a text nor a binary payload
    #[error("Secret '{secret_id}' has neither a text nor a binary payload")]
    SecretPayload { secret_id: String },

    /// A marker entry has no usable secret identifier
    #[error("Invalid secret marker at '{path}': {reason}")]
    InvalidMarker { path: String, reason: String },

    /// The fetched payload is not parseable JSON
    #[error("Malformed secret payload for '{path}': {source}")]
    MalformedSecretPayload {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },
}

impl ConfigSecretsError {
    /// Create a secret not found error
    pub fn secret_not_found<S: Into<String>>(secret_id: S) -> Self {
        Self::SecretNotFound { secret_id: secret_id.into() }
    }

    /// Create a store unavailable error
    pub fn store_unavailable<S: Into<String>, M: Into<String>>(store: S, message: M) -> Self {
        Self::StoreUnavailable { store: store.into(), message: message.into() }
    }

    /// Create an empty payload error
    pub fn secret_payload<S: Into<String>>(secret_id: S) -> Self {
        Self::SecretPayload { secret_id: secret_id.into() }
    }

    /// Create an invalid marker error
    pub fn invalid_marker<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::InvalidMarker { path: path.into(), reason: reason.into() }
    }

    /// Create a malformed payload error
    pub fn malformed_payload<P: Into<String>>(path: P, source: serde_json::Error) -> Self {
        Self::MalformedSecretPayload { path: path.into(), source }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Check if this error could succeed on a later attempt.
    ///
    /// Only store outages qualify. Retrying is left to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConfigSecretsError::StoreUnavailable { .. })
    }
}

impl From<config::ConfigError> for ConfigSecretsError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}

impl From<validator::ValidationErrors> for ConfigSecretsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
