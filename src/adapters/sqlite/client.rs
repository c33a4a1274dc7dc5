//! SQLite store client
//!
//! Holds the two keyed collections: locations (by geohash) and samples (by
//! identifier). A location is committed on its own before the sample that
//! references it is staged, so a location is never lost with a failed sample
//! and a sample never references a missing location.

use super::models::{ExportRow, LocationRow, SampleRow};
use crate::config::StoreConfig;
use crate::domain::record::{format_index_timestamp, parse_index_timestamp};
use crate::domain::{
    CanonicalRecord, GeoHash, IcesiumError, Location, Result, SampleId, SampleRecord, StoreError,
    MISSING_ELEVATION,
};
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::fmt;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS locations (
        geohash TEXT PRIMARY KEY NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        elevation REAL DEFAULT -9999.0
    )",
    "CREATE TABLE IF NOT EXISTS samples (
        identifier TEXT PRIMARY KEY NOT NULL,
        tstamp TEXT NULL,
        geohash TEXT NOT NULL REFERENCES locations (geohash),
        source INTEGER NOT NULL DEFAULT 0,
        vocabs INTEGER NOT NULL DEFAULT 0,
        syear INTEGER NULL,
        sday INTEGER NULL,
        w3 INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_samples_geohash ON samples (geohash)",
    "CREATE INDEX IF NOT EXISTS idx_samples_tstamp ON samples (tstamp)",
    "CREATE INDEX IF NOT EXISTS idx_samples_syear ON samples (syear)",
];

/// Outcome of [`SqliteStore::add_sample`]
#[derive(Debug)]
pub enum AddOutcome {
    /// A new sample row is staged and waits for [`SampleTransaction::commit`]
    Staged(SampleTransaction),

    /// A sample with this identifier already exists; nothing was written
    AlreadyPresent,

    /// The record has no geohash and cannot be stored
    MissingGeohash,
}

impl AddOutcome {
    /// True unless the record was refused
    pub fn is_accepted(&self) -> bool {
        !matches!(self, AddOutcome::MissingGeohash)
    }
}

/// An uncommitted sample insert
///
/// Dropping it without calling [`commit`](Self::commit) rolls the insert back.
#[must_use = "a staged sample is rolled back unless committed"]
pub struct SampleTransaction {
    tx: Transaction<'static, Sqlite>,
    identifier: SampleId,
    location_created: bool,
}

impl SampleTransaction {
    /// Identifier of the staged sample
    pub fn identifier(&self) -> &SampleId {
        &self.identifier
    }

    /// Whether staging this sample created its location
    pub fn location_created(&self) -> bool {
        self.location_created
    }

    /// Commit the staged sample
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the insert is then discarded.
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            StoreError::CommitFailed(format!("sample {}: {}", self.identifier, e))
        })?;
        Ok(())
    }
}

impl fmt::Debug for SampleTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleTransaction")
            .field("identifier", &self.identifier)
            .field("location_created", &self.location_created)
            .finish_non_exhaustive()
    }
}

/// SQLite-backed sample store
pub struct SqliteStore {
    pool: SqlitePool,
    path: String,
}

impl SqliteStore {
    /// Open (creating if needed) the store file and ensure the schema exists
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// created.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(format!("{}: {}", config.path, e)))?;

        let store = Self {
            pool,
            path: config.path.clone(),
        };
        store.ensure_schema().await?;

        tracing::debug!(path = %store.path, "Store opened");
        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &str {
        &self.path
    }

    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::SchemaFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Return the location for `geohash`, creating it if absent
    ///
    /// A new location gets the missing-elevation sentinel and is committed
    /// immediately. An existing location is never modified. The flag is true
    /// when the location was created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup, insert or commit fails.
    pub async fn upsert_location_if_absent(
        &self,
        geohash: &GeoHash,
        latitude: f64,
        longitude: f64,
    ) -> Result<(Location, bool)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let existing = sqlx::query_as::<_, LocationRow>(
            "SELECT geohash, latitude, longitude, elevation FROM locations WHERE geohash = ?",
        )
        .bind(geohash.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        if let Some(row) = existing {
            return Ok((row.into_domain()?, false));
        }

        sqlx::query(
            "INSERT INTO locations (geohash, latitude, longitude, elevation) VALUES (?, ?, ?, ?)",
        )
        .bind(geohash.as_str())
        .bind(latitude)
        .bind(longitude)
        .bind(MISSING_ELEVATION)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::WriteFailed(format!("location {geohash}: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::CommitFailed(format!("location {geohash}: {e}")))?;

        tracing::debug!(geohash = %geohash, latitude, longitude, "Location created");

        Ok((
            Location {
                geohash: geohash.clone(),
                latitude,
                longitude,
                elevation: MISSING_ELEVATION,
            },
            true,
        ))
    }

    /// Stage a sample for insertion
    ///
    /// The record's location is created and committed first if needed. An
    /// identifier that is already stored is left untouched. The returned
    /// [`SampleTransaction`] must be committed by the caller, and no other
    /// write may be started on this store until it is committed or dropped.
    ///
    /// # Errors
    ///
    /// Returns an error on any storage failure.
    pub async fn add_sample(&self, record: &CanonicalRecord) -> Result<AddOutcome> {
        let Some(geohash) = &record.geohash else {
            tracing::warn!(id = %record.id, "Sample has no geohash, not stored");
            return Ok(AddOutcome::MissingGeohash);
        };

        let (_, location_created) = self
            .upsert_location_if_absent(geohash, record.y, record.x)
            .await?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM samples WHERE identifier = ?")
                .bind(record.id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        if exists.is_some() {
            tracing::info!(id = %record.id, "Sample already stored");
            return Ok(AddOutcome::AlreadyPresent);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        sqlx::query(
            "INSERT INTO samples (identifier, tstamp, geohash, source, vocabs, syear, sday, w3)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0)",
        )
        .bind(record.id.as_str())
        .bind(record.index_updated.as_ref().map(format_index_timestamp))
        .bind(geohash.as_str())
        .bind(i64::from(record.source.code()))
        .bind(i64::from(record.csm.value()))
        .bind(record.year.map(i64::from))
        .bind(record.day.map(i64::from))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::WriteFailed(format!("sample {}: {}", record.id, e)))?;

        Ok(AddOutcome::Staged(SampleTransaction {
            tx,
            identifier: record.id.clone(),
            location_created,
        }))
    }

    /// Latest index-update timestamp over all stored samples
    ///
    /// `None` when the store is empty or no sample carries a timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn most_recent_index_update(&self) -> Result<Option<DateTime<Utc>>> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(tstamp) FROM samples")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(latest.as_deref().and_then(parse_index_timestamp))
    }

    /// Look up a location by geohash
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_location(&self, geohash: &GeoHash) -> Result<Option<Location>> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT geohash, latitude, longitude, elevation FROM locations WHERE geohash = ?",
        )
        .bind(geohash.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        row.map(LocationRow::into_domain).transpose()
    }

    /// Look up a sample by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_sample(&self, identifier: &SampleId) -> Result<Option<SampleRecord>> {
        let row = sqlx::query_as::<_, SampleRow>(
            "SELECT identifier, tstamp, geohash, source, vocabs, syear, sday, w3
             FROM samples WHERE identifier = ?",
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        row.map(SampleRow::into_domain).transpose()
    }

    /// Number of stored samples
    pub async fn count_samples(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM samples").await
    }

    /// Number of stored locations
    pub async fn count_locations(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM locations").await
    }

    async fn count(&self, sql: &'static str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(count as u64)
    }

    /// Stream samples of `year` joined to their locations, in insertion order
    pub fn export_rows(&self, year: i32) -> BoxStream<'_, Result<ExportRow>> {
        sqlx::query_as::<_, ExportRow>(
            "SELECT s.geohash, l.latitude, l.longitude, l.elevation,
                    s.source, s.vocabs, s.syear, s.sday, s.w3
             FROM samples s
             JOIN locations l ON l.geohash = s.geohash
             WHERE s.syear = ?
             ORDER BY s.rowid",
        )
        .bind(year)
        .fetch(&self.pool)
        .map_err(|e| IcesiumError::from(StoreError::QueryFailed(e.to_string())))
        .boxed()
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
