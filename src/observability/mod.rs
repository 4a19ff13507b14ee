//! # Observability
//!
//! Structured logging for secret resolution.

pub mod logging;

pub use logging::{init_logging, log_settings_info};
