//! Shared fixtures for integration tests

#![allow(dead_code)]

use icesium::config::IcesiumConfig;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Configuration pointing at a mock index and a store inside `dir`
pub fn test_config(base_url: &str, dir: &TempDir) -> IcesiumConfig {
    let mut config = IcesiumConfig::default();
    config.source.base_url = base_url.to_string();
    config.source.page_size = 10;
    config.source.timeout_seconds = 5;
    config.store.path = dir
        .path()
        .join("records.sqlite")
        .to_string_lossy()
        .to_string();
    config
}

/// One raw index document
pub fn doc(id: &str, xy: &str, result_time: &str, updated: &str) -> Value {
    json!({
        "id": id,
        "XY": xy,
        "source": "SESAR",
        "context": ["Marine water body bottom"],
        "specimen": ["Whole organism"],
        "material": ["Sediment"],
        "producedBy_resultTime": result_time,
        "indexUpdatedTime": updated,
    })
}

/// Select handler response body
pub fn select_body(num_found: usize, docs: &[Value]) -> String {
    json!({
        "responseHeader": { "status": 0 },
        "response": { "numFound": num_found, "start": 0, "docs": docs }
    })
    .to_string()
}

/// In-memory log sink for asserting on emitted events
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Installs a WARN-level subscriber for the current thread
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
