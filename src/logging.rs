//! Logging setup utilities for embedding applications.
//!
//! The engine itself only emits `tracing` events; hosts that want output on
//! stderr can initialize a subscriber through this module instead of wiring
//! tracing-subscriber by hand.

use tracing::Level;

/// Configuration for the engine's logging setup.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the host application
    pub level: Level,
    /// Log level for split-guard components specifically
    pub engine_level: Level,
    /// Whether to use JSON output format
    pub json_format: bool,
    /// Environment filter override
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            engine_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Creates a configuration for production use.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            engine_level: Level::INFO,
            json_format: true,
            env_filter: None,
        }
    }

    /// Creates a configuration for development use.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            engine_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }

    /// Sets the log level for the host application.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets whether to use JSON output format.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Sets a custom environment filter.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            format!(
                "{},split_guard={}",
                self.level.as_str().to_lowercase(),
                self.engine_level.as_str().to_lowercase()
            )
        }
    }
}

/// Initializes a global subscriber from the given configuration.
///
/// `RUST_LOG` takes precedence over the configured filter when set.
///
/// # Examples
///
/// ```rust,no_run
/// use split_guard::logging::{init_logging, LoggingConfig};
///
/// init_logging(LoggingConfig::development()).unwrap();
/// ```
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
