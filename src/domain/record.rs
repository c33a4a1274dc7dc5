//! Record models flowing through the pipeline
//!
//! - [`RawDocument`]: a document as returned by the search index
//! - [`CanonicalRecord`]: the transformer output fed to the store
//! - [`Location`] and [`SampleRecord`]: the two persisted collections

use crate::domain::ids::{GeoHash, SampleId};
use crate::domain::result::Result;
use crate::domain::vocab::{PackedVocab, SourceCollection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Elevation value of a location whose height has not been filled in yet
pub const MISSING_ELEVATION: f64 = -9999.0;

/// Normalized UTC text form of an index-update timestamp
///
/// Fixed width with millisecond precision, so lexical order is chronological.
pub const INDEX_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a timestamp with [`INDEX_TIMESTAMP_FORMAT`]
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use icesium::domain::record::format_index_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2023, 2, 1, 10, 11, 12).unwrap();
/// assert_eq!(format_index_timestamp(&ts), "2023-02-01T10:11:12.000Z");
/// ```
pub fn format_index_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(INDEX_TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp previously written with [`format_index_timestamp`]
pub fn parse_index_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Raw search index document
///
/// Field names follow the aliases requested in the field list
/// (`XY:producedBy_samplingSite_location_ll` is returned as `XY`, etc.).
/// Every field is optional and unknown fields are ignored. Values of an
/// unexpected JSON type never fail decoding: a non-string scalar field reads
/// as absent, and a single string in a categorical field reads as a
/// one-element list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    /// Coordinate pair as `"lat,lon"`
    #[serde(rename = "XY", default, deserialize_with = "lenient_string")]
    pub xy: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub context: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub specimen: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub material: Vec<String>,

    /// Production timestamp of the sample
    #[serde(
        rename = "producedBy_resultTime",
        default,
        deserialize_with = "lenient_string"
    )]
    pub result_time: Option<String>,

    /// Time the index last updated this document
    #[serde(
        rename = "indexUpdatedTime",
        default,
        deserialize_with = "lenient_string"
    )]
    pub index_updated_time: Option<String>,
}

impl RawDocument {
    /// Decodes one document of a select response
    ///
    /// # Errors
    ///
    /// Fails only when the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => vec![s],
        // non-string elements keep their position but match no term
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Canonical record produced by the transformer
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub id: SampleId,
    pub source: SourceCollection,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
    pub geohash: Option<GeoHash>,
    pub csm: PackedVocab,
    pub year: Option<i32>,
    pub day: Option<u32>,
    pub index_updated: Option<DateTime<Utc>>,
}

/// Persisted location, keyed by geohash
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub geohash: GeoHash,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Location {
    /// True until an external process fills in the elevation
    pub fn elevation_missing(&self) -> bool {
        self.elevation == MISSING_ELEVATION
    }
}

/// Persisted sample, keyed by identifier
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub identifier: SampleId,
    pub index_updated: Option<DateTime<Utc>>,
    pub geohash: GeoHash,
    pub source: u8,
    pub vocabs: PackedVocab,
    pub year: Option<i32>,
    pub day: Option<u32>,
    /// Reserved channel, exported as blue
    pub reserved: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_document_from_index_json() {
        let doc: RawDocument = serde_json::from_value(serde_json::json!({
            "id": "ark:/28722/k2x63mr5b",
            "XY": "37.87,-122.27",
            "source": "OPENCONTEXT",
            "context": ["Site of past human activities"],
            "material": ["Anthropogenic material", "Rock"],
            "producedBy_resultTime": "2003-06-11T00:00:00Z",
            "indexUpdatedTime": "2023-02-01T10:11:12.345Z",
            "score": 1.0
        }))
        .unwrap();

        assert_eq!(doc.id.as_deref(), Some("ark:/28722/k2x63mr5b"));
        assert_eq!(doc.xy.as_deref(), Some("37.87,-122.27"));
        assert_eq!(doc.material.len(), 2);
        assert!(doc.specimen.is_empty());
    }

    #[test]
    fn test_raw_document_all_fields_optional() {
        let doc: RawDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, RawDocument::default());
    }

    #[test]
    fn test_raw_document_tolerates_unexpected_types() {
        let doc = RawDocument::from_value(serde_json::json!({
            "id": 12345,
            "XY": "10.0,20.0",
            "source": ["SESAR"],
            "context": "Marine biome",
            "specimen": {"label": "Whole organism"},
            "material": [7, "Rock"],
            "producedBy_resultTime": 2021,
            "indexUpdatedTime": null
        }))
        .unwrap();

        assert!(doc.id.is_none());
        assert_eq!(doc.xy.as_deref(), Some("10.0,20.0"));
        assert!(doc.source.is_none());
        assert_eq!(doc.context, vec!["Marine biome".to_string()]);
        assert!(doc.specimen.is_empty());
        assert_eq!(doc.material, vec!["7".to_string(), "Rock".to_string()]);
        assert!(doc.result_time.is_none());
        assert!(doc.index_updated_time.is_none());
    }

    #[test]
    fn test_raw_document_from_non_object_fails() {
        let err = RawDocument::from_value(serde_json::json!(["not", "a", "document"])).unwrap_err();
        assert!(matches!(err, crate::domain::IcesiumError::Serialization(_)));
    }

    #[test]
    fn test_index_timestamp_text_form() {
        let ts = parse_index_timestamp("2023-02-01T10:11:12.345Z").unwrap();
        assert_eq!(format_index_timestamp(&ts), "2023-02-01T10:11:12.345Z");
        assert!(parse_index_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_location_elevation_missing() {
        let location = Location {
            geohash: GeoHash::new("9q9p1").unwrap(),
            latitude: 37.0,
            longitude: -122.0,
            elevation: MISSING_ELEVATION,
        };
        assert!(location.elevation_missing());
    }
}
