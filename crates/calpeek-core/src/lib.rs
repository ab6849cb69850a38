pub mod config;

pub use config::{
    AuthConfig, CalendarConfig, Config, DisplayConfig, Locale, LoggingConfig, SearchConfig,
    ValidationResult, CALENDAR_READONLY_SCOPE, DEFAULT_API_BASE_URL,
};

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` wins over `default_filter`. Logs go to stderr so they never
/// interleave with prompts on stdout.
pub fn init(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("calpeek core initialized");
    Ok(())
}
