//! Record transformation
//!
//! Turns a raw index document into a [`CanonicalRecord`] or a
//! [`TransformRejection`]. Coordinate, timestamp and geohash computations are
//! memoized in bounded LRU caches owned by the [`Transformer`], since the same
//! raw strings recur heavily across a paginated dataset.

pub mod cache;
pub mod parse;

use crate::domain::vocab::{CONTEXT, MATERIAL, SPECIMEN};
use crate::domain::{
    CanonicalRecord, GeoHash, PackedVocab, RawDocument, SampleId, SourceCollection,
    TransformRejection,
};
use cache::LruCache;
use chrono::{DateTime, Datelike, Utc};

/// Document transformer with memoized parsers
///
/// # Examples
///
/// ```
/// use icesium::core::transform::Transformer;
/// use icesium::domain::RawDocument;
///
/// let mut transformer = Transformer::new(1024);
/// let doc = RawDocument {
///     id: Some("ark:/21547/Car2PIC_TM_20".to_string()),
///     xy: Some("37.87,-122.27".to_string()),
///     source: Some("SESAR".to_string()),
///     ..Default::default()
/// };
///
/// let record = transformer.transform(&doc).unwrap();
/// assert_eq!(record.x, -122.27);
/// assert_eq!(record.source.code(), 2);
/// assert!(record.year.is_none());
/// ```
#[derive(Debug)]
pub struct Transformer {
    coordinates: LruCache<String, Option<(f64, f64)>>,
    timestamps: LruCache<String, Option<DateTime<Utc>>>,
    geohashes: LruCache<(u64, u64), Option<GeoHash>>,
}

impl Transformer {
    /// Create a transformer whose caches hold at most `cache_capacity` entries each
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            coordinates: LruCache::new(cache_capacity),
            timestamps: LruCache::new(cache_capacity),
            geohashes: LruCache::new(cache_capacity),
        }
    }

    /// Transform one raw document
    ///
    /// # Errors
    ///
    /// Rejects documents without an identifier and documents whose coordinate
    /// field is absent, malformed or out of range. A missing or unparseable
    /// production timestamp is not a rejection; year and day are left empty.
    pub fn transform(
        &mut self,
        doc: &RawDocument,
    ) -> std::result::Result<CanonicalRecord, TransformRejection> {
        let id = doc
            .id
            .as_deref()
            .and_then(|id| SampleId::new(id).ok())
            .ok_or(TransformRejection::MissingIdentifier)?;

        let raw_xy = doc
            .xy
            .as_deref()
            .ok_or(TransformRejection::MissingCoordinates)?;
        let (x, y) = self
            .coordinates(raw_xy)
            .ok_or_else(|| TransformRejection::InvalidCoordinates(raw_xy.to_string()))?;

        let geohash = self.geohash(x, y);

        let csm = PackedVocab::pack(
            CONTEXT.code_for_first(&doc.context),
            SPECIMEN.code_for_first(&doc.specimen),
            MATERIAL.code_for_first(&doc.material),
        );

        let source = doc
            .source
            .as_deref()
            .map(SourceCollection::from_label)
            .unwrap_or_default();

        let produced = doc.result_time.as_deref().and_then(|t| self.timestamp(t));
        let index_updated = doc
            .index_updated_time
            .as_deref()
            .and_then(|t| self.timestamp(t));

        Ok(CanonicalRecord {
            id,
            source,
            x,
            y,
            geohash,
            csm,
            year: produced.map(|t| t.year()),
            day: produced.map(|t| t.ordinal()),
            index_updated,
        })
    }

    /// Memoized [`parse::parse_coordinates`]
    pub fn coordinates(&mut self, raw: &str) -> Option<(f64, f64)> {
        self.coordinates
            .get_or_insert_with(raw.to_string(), |k| parse::parse_coordinates(k))
    }

    /// Memoized [`parse::parse_timestamp`]
    pub fn timestamp(&mut self, raw: &str) -> Option<DateTime<Utc>> {
        self.timestamps
            .get_or_insert_with(raw.to_string(), |k| parse::parse_timestamp(k))
    }

    /// Memoized geohash of a longitude/latitude pair
    pub fn geohash(&mut self, x: f64, y: f64) -> Option<GeoHash> {
        self.geohashes
            .get_or_insert_with((x.to_bits(), y.to_bits()), |_| {
                match GeoHash::encode(x, y) {
                    Ok(hash) => Some(hash),
                    Err(e) => {
                        tracing::warn!(x, y, error = %e, "Geohash encoding failed");
                        None
                    }
                }
            })
    }

    /// Cache hits and misses summed over all caches
    pub fn cache_stats(&self) -> (u64, u64) {
        (
            self.coordinates.hits() + self.timestamps.hits() + self.geohashes.hits(),
            self.coordinates.misses() + self.timestamps.misses() + self.geohashes.misses(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, xy: Option<&str>) -> RawDocument {
        RawDocument {
            id: Some(id.to_string()),
            xy: xy.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_transform_full_document() {
        let mut transformer = Transformer::new(16);
        let raw = RawDocument {
            id: Some("ark:/28722/k2x63mr5b".to_string()),
            xy: Some("37.87,-122.27".to_string()),
            source: Some("OpenContext".to_string()),
            context: vec!["Site of past human activities".to_string()],
            specimen: vec!["Artifact".to_string()],
            material: vec!["Anthropogenic material".to_string(), "Rock".to_string()],
            result_time: Some("2003-06-11T00:00:00Z".to_string()),
            index_updated_time: Some("2023-02-01T10:11:12.345Z".to_string()),
        };

        let record = transformer.transform(&raw).unwrap();
        assert_eq!(record.id.as_str(), "ark:/28722/k2x63mr5b");
        assert_eq!(record.source, SourceCollection::OpenContext);
        assert_eq!((record.x, record.y), (-122.27, 37.87));
        assert_eq!(record.geohash.as_ref().unwrap().as_str().len(), 11);
        assert_eq!(record.csm.unpack(), (1, 5, 4));
        assert_eq!(record.year, Some(2003));
        assert_eq!(record.day, Some(162));
        assert!(record.index_updated.is_some());
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        let mut transformer = Transformer::new(16);
        assert_eq!(
            transformer.transform(&doc("a", None)),
            Err(TransformRejection::MissingCoordinates)
        );
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let mut transformer = Transformer::new(16);
        assert_eq!(
            transformer.transform(&doc("a", Some("95.0,10.0"))),
            Err(TransformRejection::InvalidCoordinates("95.0,10.0".to_string()))
        );
        assert_eq!(
            transformer.transform(&doc("b", Some("lat,lon"))),
            Err(TransformRejection::InvalidCoordinates("lat,lon".to_string()))
        );
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let mut transformer = Transformer::new(16);
        let raw = RawDocument {
            xy: Some("10,10".to_string()),
            ..Default::default()
        };
        assert_eq!(
            transformer.transform(&raw),
            Err(TransformRejection::MissingIdentifier)
        );
    }

    #[test]
    fn test_unparseable_production_time_is_accepted() {
        let mut transformer = Transformer::new(16);
        let mut raw = doc("a", Some("10,20"));
        raw.result_time = Some("sometime in 1999".to_string());

        let record = transformer.transform(&raw).unwrap();
        assert!(record.year.is_none());
        assert!(record.day.is_none());
    }

    #[test]
    fn test_unknown_vocabulary_maps_to_zero() {
        let mut transformer = Transformer::new(16);
        let mut raw = doc("a", Some("10,20"));
        raw.source = Some("somewhere else".to_string());
        raw.material = vec!["unobtainium".to_string()];

        let record = transformer.transform(&raw).unwrap();
        assert_eq!(record.source.code(), 0);
        assert_eq!(record.csm.value(), 0);
    }

    #[test]
    fn test_odd_field_types_handled_per_record() {
        let mut transformer = Transformer::new(16);
        let raw = RawDocument::from_value(serde_json::json!({
            "id": "s1",
            "XY": "10,20",
            "source": ["SESAR"],
            "context": "Marine biome",
            "material": [3, "Rock"]
        }))
        .unwrap();

        let record = transformer.transform(&raw).unwrap();
        assert_eq!(record.source.code(), 0);
        assert_eq!(record.csm.unpack(), (12, 0, 0));

        let numeric_id = RawDocument::from_value(serde_json::json!({"id": 7, "XY": "10,20"})).unwrap();
        assert_eq!(
            transformer.transform(&numeric_id),
            Err(TransformRejection::MissingIdentifier)
        );
    }

    #[test]
    fn test_repeated_inputs_hit_cache() {
        let mut transformer = Transformer::new(16);
        for id in ["a", "b", "c"] {
            transformer.transform(&doc(id, Some("10,20"))).unwrap();
        }
        let (hits, misses) = transformer.cache_stats();
        // one miss each for coordinates and geohash, then hits
        assert_eq!(misses, 2);
        assert_eq!(hits, 4);
    }
}
