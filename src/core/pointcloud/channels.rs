//! Per-point attribute mapping
//!
//! Year and day-of-year are spread over the 16-bit color range so a viewer
//! can color points by age and season.

/// Years at or after this map to full red
pub const RED_MAX_YEAR: i32 = 2022;

/// Years before this map to zero red
pub const RED_MIN_YEAR: i32 = 1022;

const RED_SCALE: f64 = 65.535;

/// 65535 spread over a 366-day year
const GREEN_SCALE: f64 = 179.0573770491803;

/// Red channel for a production year
///
/// # Examples
///
/// ```
/// use icesium::core::pointcloud::channels::red;
///
/// assert_eq!(red(2022), 65535);
/// assert_eq!(red(1021), 0);
/// assert_eq!(red(1522), 32767);
/// ```
pub fn red(year: i32) -> u16 {
    if year >= RED_MAX_YEAR {
        return u16::MAX;
    }
    if year < RED_MIN_YEAR {
        return 0;
    }
    (f64::from(year - RED_MIN_YEAR) * RED_SCALE) as u16
}

/// Green channel for a 1-based day of the year
pub fn green(day: u32) -> u16 {
    let scaled = (f64::from(day) * GREEN_SCALE).trunc();
    scaled.clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Height of the `n`-th point (1-based) at a location
///
/// The missing-elevation sentinel and an absent elevation both count as 0.
pub fn height(base_height: f64, elevation: Option<f64>, jitter_step: f64, n: u32) -> f64 {
    let elevation = match elevation {
        Some(e) if e != crate::domain::MISSING_ELEVATION => e,
        _ => 0.0,
    };
    base_height + elevation + jitter_step * f64::from(n)
}
