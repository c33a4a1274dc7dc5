//! Raw field parsers
//!
//! Pure functions; the [`Transformer`](super::Transformer) memoizes them.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Accepted timestamp layouts, tried in order
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ"];

/// Parses a `"lat,lon"` pair into `(longitude, latitude)`
///
/// Returns `None` unless there are exactly two numeric parts with
/// -90 < lat < 90 and -180 < lon < 180.
///
/// # Examples
///
/// ```
/// use icesium::core::transform::parse::parse_coordinates;
///
/// assert_eq!(parse_coordinates("37.5, -122.25"), Some((-122.25, 37.5)));
/// assert_eq!(parse_coordinates("90,0"), None);
/// ```
pub fn parse_coordinates(raw: &str) -> Option<(f64, f64)> {
    let mut parts = raw.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    // NaN fails both comparisons
    if !(lat > -90.0 && lat < 90.0) || !(lon > -180.0 && lon < 180.0) {
        return None;
    }
    Some((lon, lat))
}

/// Parses a UTC "Zulu" timestamp with or without fractional seconds
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
    })
}
