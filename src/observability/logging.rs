//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! Secret values never reach a log line: stores, the fetcher and the
//! resolver log identifiers, paths and counts only.

use crate::config::{LoggingConfig, Settings};
use tracing_subscriber::{fmt, EnvFilter};

/// Create a tracing span for one provider load.
///
/// Every load gets a fresh `load_id` so the markers, fetches and overrides
/// of a single load can be correlated.
///
/// ```rust,ignore
/// let span = load_span!("AwsSecret");
/// let span = load_span!("AwsSecret", store = "vault");
/// ```
#[macro_export]
macro_rules! load_span {
    ($marker_key:expr) => {
        tracing::info_span!(
            "secrets_load",
            marker_key = %$marker_key,
            load_id = %uuid::Uuid::new_v4(),
            markers = tracing::field::Empty,
            overrides = tracing::field::Empty
        )
    };
    ($marker_key:expr, $($field:tt)*) => {
        tracing::info_span!(
            "secrets_load",
            marker_key = %$marker_key,
            load_id = %uuid::Uuid::new_v4(),
            markers = tracing::field::Empty,
            overrides = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the configured level is used as
/// the filter directive. Returns `false` when a global subscriber was
/// already installed, which is not an error.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = if config.json_logging {
        fmt().with_env_filter(filter).json().with_current_span(true).try_init().is_ok()
    } else {
        fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
    };

    if installed {
        tracing::debug!(
            log_level = %config.log_level,
            json = config.json_logging,
            "Logging initialized"
        );
    }

    installed
}

/// Log settings at startup
pub fn log_settings_info(settings: &Settings) {
    tracing::info!(
        marker_key = %settings.provider.marker_key,
        key_delimiter = %settings.provider.key_delimiter,
        store = %settings.provider.store,
        fetch_timeout_seconds = settings.provider.fetch_timeout_seconds,
        vault_configured = settings.vault.is_some(),
        "Secrets provider configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_macros_compile() {
        let _span = load_span!("AwsSecret");
        let _span = load_span!("AwsSecret", store = "vault");
    }

    #[traced_test]
    #[test]
    fn test_log_settings_info() {
        log_settings_info(&Settings::default());

        assert!(logs_contain("marker_key=AwsSecret"));
        assert!(logs_contain("store=env"));
    }
}
