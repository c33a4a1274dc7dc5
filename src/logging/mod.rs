//! Logging and observability
//!
//! Structured logging with tracing: human-readable lines on stderr and
//! optional rotated JSON files.
//!
//! # Example
//!
//! ```no_run
//! use icesium::config::LoggingConfig;
//! use icesium::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("DEBUG", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_verbosity, LoggingGuard};

/// Log a progress checkpoint of a long-running loop
///
/// # Example
///
/// ```no_run
/// use icesium::log_progress;
///
/// log_progress!("ingest", 1200);
/// ```
#[macro_export]
macro_rules! log_progress {
    ($phase:expr, $count:expr) => {
        tracing::info!(phase = $phase, count = $count, "Progress");
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use icesium::log_error_with_context;
/// use icesium::domain::IcesiumError;
///
/// let error = IcesiumError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
