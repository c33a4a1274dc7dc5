//! CLI command implementations
//!
//! Each command returns the process exit code:
//! 0 success, 2 configuration error, 4 store or client setup failure,
//! 5 fatal error during the run.

pub mod csv;
pub mod get;
