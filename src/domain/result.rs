//! Result type alias for Icesium

use super::errors::IcesiumError;

/// Result type alias for Icesium operations
///
/// # Examples
///
/// ```
/// use icesium::domain::result::Result;
/// use icesium::domain::errors::IcesiumError;
///
/// fn failing_function() -> Result<()> {
///     Err(IcesiumError::Other("nothing to do".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IcesiumError>;
