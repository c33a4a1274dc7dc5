//! Configuration schema types
//!
//! This module defines the configuration structure for Icesium. Every section
//! has defaults so an empty file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};

/// Main Icesium configuration
///
/// Constructed once at startup and passed by reference to the fetcher,
/// the store and the exporter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcesiumConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Remote search index settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Local store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Point-cloud export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IcesiumConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()?;
        self.ingest.validate()?;
        self.store.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Verbosity (DEBUG, INFO, WARNING, ERROR, FATAL)
    ///
    /// Not validated: unknown values fall back to INFO when logging starts.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Remote search index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the index service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Select handler path, joined onto the base URL
    #[serde(default = "default_select_path")]
    pub select_path: String,

    /// Documents requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Field list requested for every document
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("source.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("source.base_url must start with http:// or https://".to_string());
        }

        if !(1..=50_000).contains(&self.page_size) {
            return Err(format!(
                "source.page_size must be between 1 and 50000, got {}",
                self.page_size
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be > 0".to_string());
        }

        if self.fields.is_empty() {
            return Err("source.fields cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            select_path: default_select_path(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            fields: default_fields(),
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Query used when `get` is run without `--query`
    #[serde(default = "default_query")]
    pub default_query: String,

    /// Maximum number of documents consumed in one run
    #[serde(default = "default_max_records")]
    pub max_records: u64,

    /// Report progress every N processed documents
    #[serde(default = "default_ingest_progress_interval")]
    pub progress_interval: u64,

    /// Capacity of each parser memo cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl IngestConfig {
    fn validate(&self) -> Result<(), String> {
        if self.progress_interval == 0 {
            return Err("ingest.progress_interval must be > 0".to_string());
        }
        if self.cache_capacity == 0 {
            return Err("ingest.cache_capacity must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
            max_records: default_max_records(),
            progress_interval: default_ingest_progress_interval(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// Local store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("store.path cannot be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("store.max_connections must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Point-cloud export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Only samples produced in this year are exported
    #[serde(default = "default_target_year")]
    pub target_year: i32,

    /// Height added to every point
    #[serde(default = "default_base_height")]
    pub base_height: f64,

    /// Vertical step between co-located points
    #[serde(default = "default_jitter_step")]
    pub jitter_step: f64,

    /// Log progress every N rows
    #[serde(default = "default_export_progress_interval")]
    pub progress_interval: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.jitter_step <= 0.0 {
            return Err(format!(
                "export.jitter_step must be > 0, got {}",
                self.jitter_step
            ));
        }
        if self.progress_interval == 0 {
            return Err("export.progress_interval must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            target_year: default_target_year(),
            base_height: default_base_height(),
            jitter_step: default_jitter_step(),
            progress_interval: default_export_progress_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_base_url() -> String {
    "https://hyde.cyverse.org/isamples_central/".to_string()
}

fn default_select_path() -> String {
    "thing/select".to_string()
}

fn default_page_size() -> usize {
    10_000
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

/// Field list requested from the index
pub fn default_fields() -> Vec<String> {
    [
        "id",
        "XY:producedBy_samplingSite_location_ll",
        "source",
        "context:hasContextCategory",
        "material:hasMaterialCategory",
        "specimen:hasSpecimenCategory",
        "producedBy_resultTime",
        "indexUpdatedTime",
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}

fn default_query() -> String {
    "producedBy_samplingSite_location_ll:[* TO *]".to_string()
}

fn default_max_records() -> u64 {
    8_000_000
}

fn default_ingest_progress_interval() -> u64 {
    100
}

fn default_cache_capacity() -> usize {
    100_000
}

fn default_store_path() -> String {
    "records.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_target_year() -> i32 {
    2022
}

fn default_base_height() -> f64 {
    10.0
}

fn default_jitter_step() -> f64 {
    0.3
}

fn default_export_progress_interval() -> u64 {
    100_000
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
