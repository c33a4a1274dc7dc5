//! Domain error types
//!
//! This module defines the error hierarchy for Icesium.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Icesium error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum IcesiumError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search index errors
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// Local store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Point-cloud export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Search index errors
///
/// Errors that occur when paging through the remote index.
/// None of these are retried; they end the run.
#[derive(Debug, Error)]
pub enum SearchIndexError {
    /// Failed to reach the index
    #[error("Failed to connect to search index: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Index answered with a non-success status
    #[error("Query failed: {status} - {message}")]
    QueryFailed { status: u16, message: String },

    /// Response body was not the expected select document
    #[error("Invalid response from search index: {0}")]
    InvalidResponse(String),
}

/// Local store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the database file
    #[error("Failed to open store: {0}")]
    ConnectionFailed(String),

    /// Failed to create tables or indexes
    #[error("Failed to initialize schema: {0}")]
    SchemaFailed(String),

    /// Failed to read rows
    #[error("Failed to query store: {0}")]
    QueryFailed(String),

    /// Failed to insert rows
    #[error("Failed to write to store: {0}")]
    WriteFailed(String),

    /// Failed to commit a transaction
    #[error("Failed to commit transaction: {0}")]
    CommitFailed(String),
}

/// Reason a raw document was dropped by the transformer
///
/// Rejections are recovered at record granularity: the document is
/// skipped, a warning is logged and the run continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformRejection {
    /// The coordinate field is absent
    #[error("missing coordinates")]
    MissingCoordinates,

    /// The coordinate field is malformed or out of range
    #[error("invalid coordinates '{0}'")]
    InvalidCoordinates(String),

    /// The document has no identifier
    #[error("missing identifier")]
    MissingIdentifier,
}

impl From<std::io::Error> for IcesiumError {
    fn from(err: std::io::Error) -> Self {
        IcesiumError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for IcesiumError {
    fn from(err: serde_json::Error) -> Self {
        IcesiumError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for IcesiumError {
    fn from(err: toml::de::Error) -> Self {
        IcesiumError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for IcesiumError {
    fn from(err: csv::Error) -> Self {
        IcesiumError::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icesium_error_display() {
        let err = IcesiumError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_search_index_error_conversion() {
        let err: IcesiumError = SearchIndexError::QueryFailed {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, IcesiumError::SearchIndex(_)));
        assert_eq!(err.to_string(), "Search index error: Query failed: 500 - boom");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: IcesiumError = StoreError::CommitFailed("locked".to_string()).into();
        assert!(matches!(err, IcesiumError::Store(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: IcesiumError = io_err.into();
        assert!(matches!(err, IcesiumError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: IcesiumError = toml_err.into();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_rejection_display() {
        let rejection = TransformRejection::InvalidCoordinates("91,0".to_string());
        assert_eq!(rejection.to_string(), "invalid coordinates '91,0'");
    }
}
