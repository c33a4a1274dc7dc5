//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::IcesiumConfig;
use crate::domain::errors::IcesiumError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into IcesiumConfig
/// 4. Applies environment variable overrides (ICESIUM_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use icesium::config::loader::load_config;
///
/// let config = load_config("icesium.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<IcesiumConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IcesiumError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        IcesiumError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: IcesiumConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        IcesiumError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Builds the configuration without a file: defaults plus environment overrides
///
/// # Errors
///
/// Returns an error if an override produces an invalid configuration.
pub fn load_default_config() -> Result<IcesiumConfig> {
    let mut config = IcesiumConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        IcesiumError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| IcesiumError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(IcesiumError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ICESIUM_* prefix
///
/// Environment variables follow the pattern ICESIUM_<SECTION>_<KEY>, for
/// example ICESIUM_SOURCE_BASE_URL or ICESIUM_STORE_PATH. Unparseable
/// numeric values are ignored.
fn apply_env_overrides(config: &mut IcesiumConfig) {
    if let Ok(val) = std::env::var("ICESIUM_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("ICESIUM_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Ok(val) = std::env::var("ICESIUM_SOURCE_SELECT_PATH") {
        config.source.select_path = val;
    }
    if let Some(size) = env_parse("ICESIUM_SOURCE_PAGE_SIZE") {
        config.source.page_size = size;
    }
    if let Some(timeout) = env_parse("ICESIUM_SOURCE_TIMEOUT_SECONDS") {
        config.source.timeout_seconds = timeout;
    }

    if let Ok(val) = std::env::var("ICESIUM_INGEST_DEFAULT_QUERY") {
        config.ingest.default_query = val;
    }
    if let Some(max) = env_parse("ICESIUM_INGEST_MAX_RECORDS") {
        config.ingest.max_records = max;
    }
    if let Some(capacity) = env_parse("ICESIUM_INGEST_CACHE_CAPACITY") {
        config.ingest.cache_capacity = capacity;
    }

    if let Ok(val) = std::env::var("ICESIUM_STORE_PATH") {
        config.store.path = val;
    }

    if let Some(year) = env_parse("ICESIUM_EXPORT_TARGET_YEAR") {
        config.export.target_year = year;
    }

    if let Ok(val) = std::env::var("ICESIUM_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ICESIUM_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
