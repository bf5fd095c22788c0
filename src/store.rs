//! Append-only growth data, keyed by timestamp and persisted as one JSON document.
//!
//! The document is rewritten in full after every accepted insert. Writes go straight to the
//! target path, so an interrupted write can leave it truncated. Concurrent writers must be
//! serialized by the caller.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    config::DEFAULT_DATA_PATH,
    error::{AnalysisError, Result},
    record::GrowthRecord,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthDataStore {
    path: PathBuf,
    records: BTreeMap<String, GrowthRecord>,
}

impl Default for GrowthDataStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl GrowthDataStore {
    /// An empty store that persists to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: BTreeMap::new(),
        }
    }

    /// A store bound to `path`, preloaded from it when the document exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        let path = store.path.clone();
        store.load(&path)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory records with the document at `path`. A missing document leaves
    /// the store empty.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no growth data yet, starting empty");
            self.records.clear();
            return Ok(());
        }

        let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
        self.records = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AnalysisError::json(path, e))?;
        tracing::debug!(path = %path.display(), records = self.records.len(), "loaded growth data");
        Ok(())
    }

    /// Writes every record to `path` as a 2-space indented JSON object, replacing its content.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.records)
            .map_err(|e| AnalysisError::json(path, e))?;
        writer.flush().map_err(|e| AnalysisError::io(path, e))
    }

    /// Adds `record` unless its timestamp is already stored, persisting to the bound path on
    /// success.
    ///
    /// Returns `false` (and leaves the existing record untouched) for a duplicate timestamp.
    pub fn insert(&mut self, record: GrowthRecord) -> Result<bool> {
        if self.records.contains_key(&record.timestamp) {
            tracing::debug!(timestamp = %record.timestamp, "timestamp already recorded");
            return Ok(false);
        }

        let timestamp = record.timestamp.clone();
        self.records.insert(timestamp.clone(), record);
        if let Err(e) = self.persist(&self.path) {
            self.records.remove(&timestamp);
            return Err(e);
        }
        tracing::info!(%timestamp, path = %self.path.display(), "stored growth record");
        Ok(true)
    }

    pub fn get(&self, timestamp: &str) -> Option<&GrowthRecord> {
        self.records.get(timestamp)
    }

    pub fn contains(&self, timestamp: &str) -> bool {
        self.records.contains_key(timestamp)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in timestamp order.
    pub fn records(&self) -> impl Iterator<Item = &GrowthRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ColorSignature;

    fn record(timestamp: &str, area_px: f64) -> GrowthRecord {
        GrowthRecord {
            timestamp: timestamp.to_string(),
            area_px,
            width_px: 40.0,
            height_px: 32.0,
            aspect_ratio: 1.25,
            color: ColorSignature {
                hue: 61.5,
                saturation: 200.25,
                value: 180.0,
            },
            contour: vec![[10, 10], [49, 10], [49, 39], [10, 39]],
        }
    }

    #[test]
    fn duplicate_timestamp_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GrowthDataStore::new(dir.path().join("growth_data.json"));

        assert!(store.insert(record("2024-05-01T08:00:00", 1131.0)).unwrap());
        assert!(!store.insert(record("2024-05-01T08:00:00", 9999.0)).unwrap());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2024-05-01T08:00:00").unwrap().area_px, 1131.0);

        let reloaded = GrowthDataStore::open(store.path()).unwrap();
        assert_eq!(reloaded.get("2024-05-01T08:00:00").unwrap().area_px, 1131.0);
    }

    #[test]
    fn insert_persists_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth_data.json");
        let mut store = GrowthDataStore::new(&path);
        store.insert(record("2024-05-02T08:00:00", 1500.0)).unwrap();
        store.insert(record("2024-05-01T08:00:00", 1131.0)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc.as_object().unwrap().len(), 2);
        assert_eq!(doc["2024-05-02T08:00:00"]["area_px"], 1500.0);
        assert!(text.contains("\n  \"2024-05-01T08:00:00\": {"));
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth_data.json");
        let mut store = GrowthDataStore::new(&path);
        store.insert(record("2024-05-01T08:00:00", 1131.0)).unwrap();
        store.insert(record("2024-05-03T08:00:00", 1702.5)).unwrap();

        let other = dir.path().join("copy.json");
        store.persist(&other).unwrap();

        let mut fresh = GrowthDataStore::new(&other);
        fresh.load(&other).unwrap();
        assert_eq!(
            fresh.records().collect::<Vec<_>>(),
            store.records().collect::<Vec<_>>()
        );
    }

    #[test]
    fn missing_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = GrowthDataStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth_data.json");
        std::fs::write(&path, "{\"2024\": ").unwrap();
        assert!(matches!(
            GrowthDataStore::open(&path),
            Err(AnalysisError::Json { .. })
        ));
    }

    #[test]
    fn records_iterate_in_timestamp_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GrowthDataStore::new(dir.path().join("growth_data.json"));
        for ts in ["2024-05-03T08:00:00", "2024-05-01T08:00:00", "2024-05-02T08:00:00"] {
            store.insert(record(ts, 1.0)).unwrap();
        }
        let order: Vec<&str> = store.records().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(
            order,
            ["2024-05-01T08:00:00", "2024-05-02T08:00:00", "2024-05-03T08:00:00"]
        );
        assert!(store.contains("2024-05-02T08:00:00"));
    }

    #[test]
    fn failed_persist_rolls_back_insert() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GrowthDataStore::new(dir.path().join("missing_dir").join("data.json"));
        let err = store.insert(record("2024-05-01T08:00:00", 1.0)).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
        assert!(store.is_empty());
    }
}
