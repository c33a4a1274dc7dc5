//! Local relational store adapter
//!
//! Locations keyed by geohash and samples keyed by identifier, in one SQLite
//! file.

pub mod client;
pub mod models;

pub use client::{AddOutcome, SampleTransaction, SqliteStore};
pub use models::ExportRow;
