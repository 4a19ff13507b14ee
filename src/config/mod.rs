//! # Configuration Management
//!
//! Settings for the provider, loaded from environment variables or
//! deserialized from any serde source.

pub mod settings;

pub use settings::{
    LoggingConfig, ProviderSettings, Settings, DEFAULT_KEY_DELIMITER, DEFAULT_MARKER_KEY,
};
