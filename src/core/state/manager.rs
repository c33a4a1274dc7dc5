//! Watermark loading from the local store

use crate::adapters::sqlite::SqliteStore;
use crate::core::state::watermark::Watermark;
use crate::domain::Result;

/// Derives the sync watermark from persisted samples
pub struct StateManager<'a> {
    store: &'a SqliteStore,
}

impl<'a> StateManager<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Load the watermark for the next run
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub async fn load_watermark(&self) -> Result<Watermark> {
        let watermark = Watermark::from(self.store.most_recent_index_update().await?);

        if watermark.is_initial() {
            tracing::info!("No watermark found, fetching all matching records");
        } else {
            tracing::info!(watermark = %watermark, "Resuming from watermark");
        }

        Ok(watermark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::AddOutcome;
    use crate::config::StoreConfig;
    use crate::domain::{CanonicalRecord, GeoHash, PackedVocab, SampleId, SourceCollection};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_watermark_from_store() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&StoreConfig {
            path: dir.path().join("state.sqlite").to_string_lossy().to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let manager = StateManager::new(&store);
        assert!(manager.load_watermark().await.unwrap().is_initial());

        let updated = Utc.with_ymd_and_hms(2024, 4, 2, 6, 0, 0).unwrap();
        let record = CanonicalRecord {
            id: SampleId::new("s1").unwrap(),
            source: SourceCollection::Geome,
            x: 1.0,
            y: 2.0,
            geohash: Some(GeoHash::encode(1.0, 2.0).unwrap()),
            csm: PackedVocab::default(),
            year: None,
            day: None,
            index_updated: Some(updated),
        };
        if let AddOutcome::Staged(tx) = store.add_sample(&record).await.unwrap() {
            tx.commit().await.unwrap();
        }

        let watermark = manager.load_watermark().await.unwrap();
        assert_eq!(watermark.since(), Some(updated));
    }
}
