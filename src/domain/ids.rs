//! Domain identifier types with validation
//!
//! Newtype wrappers for the two keys of the local store: the remote record
//! identifier and the geohash of a sampling location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed geohash precision used as the location key
pub const GEOHASH_PRECISION: usize = 11;

/// Sample identifier newtype wrapper
///
/// Globally unique per remote record, e.g. `ark:/21547/Car2PIC_TM_20`.
///
/// # Examples
///
/// ```
/// use icesium::domain::ids::SampleId;
/// use std::str::FromStr;
///
/// let id = SampleId::from_str("ark:/21547/Car2PIC_TM_20").unwrap();
/// assert_eq!(id.as_str(), "ark:/21547/Car2PIC_TM_20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleId(String);

impl SampleId {
    /// Creates a new SampleId, rejecting blank identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Sample identifier cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SampleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Geohash newtype wrapper
///
/// A geohash at [`GEOHASH_PRECISION`] uniquely determines one location row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeoHash(String);

impl GeoHash {
    /// Encodes a longitude/latitude pair at the fixed precision
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinates are outside the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use icesium::domain::ids::GeoHash;
    ///
    /// let hash = GeoHash::encode(-122.27, 37.87).unwrap();
    /// assert_eq!(hash.as_str().len(), 11);
    /// assert!(hash.as_str().starts_with("9q9p"));
    /// ```
    pub fn encode(longitude: f64, latitude: f64) -> Result<Self, String> {
        geohash::encode(
            geohash::Coord {
                x: longitude,
                y: latitude,
            },
            GEOHASH_PRECISION,
        )
        .map(Self)
        .map_err(|e| format!("Failed to encode geohash for ({longitude}, {latitude}): {e}"))
    }

    /// Wraps an already encoded geohash (e.g. one read back from the store)
    pub fn new(hash: impl Into<String>) -> Result<Self, String> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err("Geohash cannot be empty".to_string());
        }
        Ok(Self(hash))
    }

    /// Returns the geohash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for GeoHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
