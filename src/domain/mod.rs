//! Domain models and types for Icesium.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed keys** ([`SampleId`], [`GeoHash`])
//! - **Records** ([`RawDocument`], [`CanonicalRecord`], [`Location`], [`SampleRecord`])
//! - **Vocabularies** ([`SourceCollection`], [`PackedVocab`] and the categorical tables)
//! - **Error types** ([`IcesiumError`], [`SearchIndexError`], [`StoreError`], [`TransformRejection`])
//! - **Result type alias** ([`Result`])

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod vocab;

pub use errors::{IcesiumError, SearchIndexError, StoreError, TransformRejection};
pub use ids::{GeoHash, SampleId, GEOHASH_PRECISION};
pub use record::{
    format_index_timestamp, parse_index_timestamp, CanonicalRecord, Location, RawDocument,
    SampleRecord, MISSING_ELEVATION,
};
pub use result::Result;
pub use vocab::{PackedVocab, SourceCollection};
