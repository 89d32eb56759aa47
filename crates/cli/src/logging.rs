use std::io;

use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `hamlet_codegen=debug`.
pub const LOG_ENV: &str = "HAMLET_LOG";

/// Log output settings from the global command line flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub verbosity: u8,
    pub json_format: bool,
}

impl LoggingConfig {
    /// Filter used when `HAMLET_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Sends logs to stderr; stdout carries the status lines.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config.default_filter()))?;

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).without_time().with_target(false))
            .try_init()?;
    }

    Ok(())
}
