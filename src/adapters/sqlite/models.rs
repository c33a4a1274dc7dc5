//! Row models for the SQLite store
//!
//! These map table rows one-to-one and convert into the domain records.

use crate::domain::record::parse_index_timestamp;
use crate::domain::{GeoHash, Location, PackedVocab, Result, SampleId, SampleRecord, StoreError};
use sqlx::FromRow;

/// Row of the `locations` table
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub geohash: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

impl LocationRow {
    /// Convert to domain Location
    ///
    /// A NULL elevation reads back as the missing-elevation sentinel.
    pub fn into_domain(self) -> Result<Location> {
        let geohash = GeoHash::new(self.geohash).map_err(StoreError::QueryFailed)?;
        Ok(Location {
            geohash,
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self
                .elevation
                .unwrap_or(crate::domain::MISSING_ELEVATION),
        })
    }
}

/// Row of the `samples` table
#[derive(Debug, Clone, FromRow)]
pub struct SampleRow {
    pub identifier: String,
    pub tstamp: Option<String>,
    pub geohash: String,
    pub source: i64,
    pub vocabs: i64,
    pub syear: Option<i64>,
    pub sday: Option<i64>,
    pub w3: i64,
}

impl SampleRow {
    /// Convert to domain SampleRecord
    pub fn into_domain(self) -> Result<SampleRecord> {
        let identifier = SampleId::new(self.identifier).map_err(StoreError::QueryFailed)?;
        let geohash = GeoHash::new(self.geohash).map_err(StoreError::QueryFailed)?;
        Ok(SampleRecord {
            identifier,
            index_updated: self.tstamp.as_deref().and_then(parse_index_timestamp),
            geohash,
            source: self.source as u8,
            vocabs: PackedVocab::from_raw(self.vocabs as u16),
            year: self.syear.map(|y| y as i32),
            day: self.sday.map(|d| d as u32),
            reserved: self.w3 as u16,
        })
    }
}

/// One sample joined to its location, as read by the exporter
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ExportRow {
    pub geohash: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub source: i64,
    pub vocabs: i64,
    pub syear: Option<i64>,
    pub sday: Option<i64>,
    pub w3: i64,
}
