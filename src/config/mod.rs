//! Configuration management for Icesium.
//!
//! Icesium runs with built-in defaults; a TOML file can override any of them.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "INFO"
//!
//! [source]
//! base_url = "https://hyde.cyverse.org/isamples_central/"
//! page_size = 10000
//! timeout_seconds = 300
//!
//! [ingest]
//! max_records = 8000000
//!
//! [store]
//! path = "${ICESIUM_DATA}/records.sqlite"
//!
//! [export]
//! target_year = 2022
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment and
//! `ICESIUM_<SECTION>_<KEY>` variables override file values.

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_default_config};
pub use schema::{
    ApplicationConfig, ExportConfig, IcesiumConfig, IngestConfig, LoggingConfig, SourceConfig,
    StoreConfig,
};
