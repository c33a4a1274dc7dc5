//! Structured logging setup using tracing
//!
//! Console output always goes to stderr so that stdout stays free for the
//! point-cloud stream. An optional JSON file layer with rotation can be
//! enabled through [`LoggingConfig`].
//!
//! # Example
//!
//! ```no_run
//! use icesium::config::LoggingConfig;
//! use icesium::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("INFO", &config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{IcesiumError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Initialize the logging system
///
/// `verbosity` is one of DEBUG, INFO, WARNING (or WARN), ERROR, FATAL (or
/// CRITICAL), case-insensitive. FATAL maps to ERROR. Anything else falls back
/// to INFO and a warning is emitted once logging is up. `RUST_LOG`, when set,
/// takes precedence over `verbosity`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_logging(verbosity: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let parsed = parse_verbosity(verbosity);
    let log_level = parsed.unwrap_or(Level::INFO);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("icesium={log_level}")));

    let mut layers = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter.clone());

    layers.push(console_layer.boxed());

    let file_guard = if config.local_enabled {
        let rotation = match config.local_rotation.as_str() {
            "hourly" => Rotation::HOURLY,
            _ => Rotation::DAILY,
        };

        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            IcesiumError::Configuration(format!(
                "Failed to create log directory {}: {}",
                config.local_path, e
            ))
        })?;

        let file_appender = RollingFileAppender::new(rotation, &config.local_path, "icesium.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(non_blocking)
            .with_filter(env_filter);

        layers.push(file_layer.boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    if parsed.is_none() {
        tracing::warn!(verbosity, "Unknown verbosity, using INFO");
    }

    tracing::debug!(
        level = %log_level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

/// Maps a verbosity name to a tracing level
pub fn parse_verbosity(verbosity: &str) -> Option<Level> {
    match verbosity.trim().to_uppercase().as_str() {
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARNING" | "WARN" => Some(Level::WARN),
        "ERROR" | "FATAL" | "CRITICAL" => Some(Level::ERROR),
        _ => None,
    }
}
