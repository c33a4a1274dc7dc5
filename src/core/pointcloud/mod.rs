//! Point-cloud export
//!
//! Streams stored samples of one year, joined to their locations, as a
//! space-delimited table:
//!
//! ```text
//! X Y Z Classification Intensity Red Green Blue
//! -122.27 37.87 10.3 2 4162 65535 8057 0
//! ```
//!
//! Rows are written as they are read, so exports of any size run in constant
//! memory apart from the per-location counters.

pub mod channels;
pub mod summary;

use crate::adapters::sqlite::{ExportRow, SqliteStore};
use crate::config::ExportConfig;
use crate::domain::Result;
use futures::TryStreamExt;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::time::Instant;

pub use summary::ExportSummary;

/// Column header of the exported table
pub const HEADER: [&str; 8] = [
    "X",
    "Y",
    "Z",
    "Classification",
    "Intensity",
    "Red",
    "Green",
    "Blue",
];

/// One exported point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub classification: i64,
    pub intensity: i64,
    pub red: u16,
    pub green: u16,
    pub blue: i64,
}

/// Point-cloud exporter
///
/// Each call to [`export`](Self::export) starts with fresh per-location
/// counters.
pub struct PointCloudExporter<'a> {
    config: &'a ExportConfig,
    store: &'a SqliteStore,
}

impl<'a> PointCloudExporter<'a> {
    pub fn new(config: &'a ExportConfig, store: &'a SqliteStore) -> Self {
        Self { config, store }
    }

    /// Write the header and one row per sample of the target year
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the output cannot be
    /// written.
    pub async fn export<W: Write>(&self, out: W) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(self.config.target_year);
        let mut stacks: HashMap<String, u32> = HashMap::new();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(out);
        writer.write_record(HEADER)?;

        tracing::info!(target_year = self.config.target_year, "Starting export");

        let mut rows = self.store.export_rows(self.config.target_year);
        while let Some(row) = rows.try_next().await? {
            let Some(point) = self.point(&row, &mut stacks) else {
                summary.rows_skipped += 1;
                continue;
            };
            writer.serialize(&point)?;
            summary.rows_written += 1;

            if summary.rows_written % self.config.progress_interval == 0 {
                crate::log_progress!("export", summary.rows_written);
            }
        }

        writer.flush()?;

        summary.distinct_locations = stacks.len() as u64;
        summary.max_stack = stacks.values().copied().max().unwrap_or(0);
        Ok(summary.with_duration(start_time.elapsed()))
    }

    /// Map one joined row to a point, bumping its location counter
    ///
    /// Rows without a positive year produce no point.
    fn point(&self, row: &ExportRow, stacks: &mut HashMap<String, u32>) -> Option<PointRow> {
        let year = row.syear.filter(|y| *y > 0)?;

        let n = stacks.entry(row.geohash.clone()).or_insert(0);
        *n += 1;

        Some(PointRow {
            x: row.longitude,
            y: row.latitude,
            z: channels::height(
                self.config.base_height,
                row.elevation,
                self.config.jitter_step,
                *n,
            ),
            classification: row.source,
            intensity: row.vocabs,
            red: channels::red(i32::try_from(year).unwrap_or(i32::MAX)),
            green: channels::green(row.sday.and_then(|d| u32::try_from(d).ok()).unwrap_or(0)),
            blue: row.w3,
        })
    }
}
