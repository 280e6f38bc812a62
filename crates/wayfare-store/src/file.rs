//! JSON-file implementation of the durable edge store.
//!
//! The whole edge set lives in one pretty-printed JSON file. Every write
//! rewrites the file through a sibling temp file and a rename, so a crash
//! mid-write leaves the previous version intact. The in-memory map under
//! the mutex always mirrors what the file last durably held; a failed
//! rewrite rolls the map back before the error is returned.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use wayfare_core::{EdgeKey, EdgeRecord, EdgeStore, PointId, StoreResult};

/// On-disk envelope around the edge records.
#[derive(Debug, Serialize, Deserialize)]
struct EdgeFile {
    version: String,
    saved_at: String,
    edges: Vec<EdgeRecord>,
}

/// `EdgeStore` backed by a single JSON file.
pub struct FileEdgeStore {
    path: PathBuf,
    edges: Mutex<BTreeMap<EdgeKey, f64>>,
}

impl FileEdgeStore {
    /// Open the store at `path`, reading any edges already saved there.
    ///
    /// A missing file is an empty store. Records with equal endpoints or a
    /// negative or non-finite cost are skipped with a warning; a file that
    /// does not parse at all is an error.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let mut edges = BTreeMap::new();
        match std::fs::read_to_string(&path) {
            Ok(json_str) => {
                let file: EdgeFile = serde_json::from_str(&json_str)?;
                for record in file.edges {
                    if !record.cost.is_finite() || record.cost < 0.0 {
                        warn!(
                            "skipping saved edge {} <-> {} with bad cost {}",
                            record.a, record.b, record.cost
                        );
                        continue;
                    }
                    let Ok(key) = EdgeKey::new(record.a, record.b) else {
                        warn!("skipping saved self-loop on point {}", record.a);
                        continue;
                    };
                    edges.insert(key, record.cost);
                }
                debug!("opened edge store {} with {} edges", path.display(), edges.len());
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("edge store {} does not exist yet", path.display());
            }
            Err(err) => return Err(err.into()),
        }
        Ok(FileEdgeStore {
            path,
            edges: Mutex::new(edges),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file from the given map via temp file and rename.
    fn persist(&self, edges: &BTreeMap<EdgeKey, f64>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = EdgeFile {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: chrono::Utc::now().to_rfc3339(),
            edges: edges
                .iter()
                .map(|(key, cost)| EdgeRecord::new(*key, *cost))
                .collect(),
        };
        let json_str = serde_json::to_string_pretty(&file)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json_str)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("edge store saved: {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl EdgeStore for FileEdgeStore {
    async fn load_all(&self) -> StoreResult<Vec<EdgeRecord>> {
        let edges = self.edges.lock().await;
        Ok(edges
            .iter()
            .map(|(key, cost)| EdgeRecord::new(*key, *cost))
            .collect())
    }

    async fn upsert(&self, key: EdgeKey, cost: f64) -> StoreResult<()> {
        let mut edges = self.edges.lock().await;
        let previous = edges.insert(key, cost);
        if let Err(err) = self.persist(&edges) {
            match previous {
                Some(old) => edges.insert(key, old),
                None => edges.remove(&key),
            };
            return Err(err);
        }
        Ok(())
    }

    async fn delete_where_endpoint(&self, p: PointId) -> StoreResult<usize> {
        let mut edges = self.edges.lock().await;
        let doomed: Vec<EdgeKey> = edges.keys().filter(|key| key.touches(p)).copied().collect();
        if doomed.is_empty() {
            return Ok(0);
        }
        let mut removed = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(cost) = edges.remove(&key) {
                removed.push((key, cost));
            }
        }
        let count = removed.len();
        if let Err(err) = self.persist(&edges) {
            for (key, cost) in removed {
                edges.insert(key, cost);
            }
            return Err(err);
        }
        Ok(count)
    }

    async fn find_pair(&self, key: EdgeKey) -> StoreResult<Option<f64>> {
        let edges = self.edges.lock().await;
        Ok(edges.get(&key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u64) -> PointId {
        PointId(id)
    }

    fn key(a: u64, b: u64) -> EdgeKey {
        EdgeKey::new(p(a), p(b)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEdgeStore::open(dir.path().join("edges.json")).unwrap();

        assert_eq!(store.path(), dir.path().join("edges.json"));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_saved_edges_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.json");

        let store = FileEdgeStore::open(&path).unwrap();
        store.upsert(key(2, 1), 4.5).await.unwrap();
        store.upsert(key(1, 3), 2.0).await.unwrap();
        drop(store);

        let reopened = FileEdgeStore::open(&path).unwrap();
        let records = reopened.load_all().await.unwrap();
        assert_eq!(
            records,
            vec![
                EdgeRecord { a: p(1), b: p(2), cost: 4.5 },
                EdgeRecord { a: p(1), b: p(3), cost: 2.0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_where_endpoint_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.json");

        let store = FileEdgeStore::open(&path).unwrap();
        store.upsert(key(1, 2), 1.0).await.unwrap();
        store.upsert(key(1, 3), 2.0).await.unwrap();
        store.upsert(key(2, 3), 3.0).await.unwrap();
        assert_eq!(store.delete_where_endpoint(p(1)).await.unwrap(), 2);
        drop(store);

        let reopened = FileEdgeStore::open(&path).unwrap();
        let records = reopened.load_all().await.unwrap();
        assert_eq!(records, vec![EdgeRecord { a: p(2), b: p(3), cost: 3.0 }]);
    }

    #[tokio::test]
    async fn test_find_pair_reads_stored_cost() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEdgeStore::open(dir.path().join("edges.json")).unwrap();
        store.upsert(key(1, 2), 7.0).await.unwrap();

        assert_eq!(store.find_pair(key(1, 2)).await.unwrap(), Some(7.0));
        assert_eq!(store.find_pair(key(1, 3)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.json");
        std::fs::write(
            &path,
            r#"{
                "version": "0.0.0",
                "saved_at": "2026-01-01T00:00:00Z",
                "edges": [
                    { "a": 1, "b": 1, "cost": 1.0 },
                    { "a": 1, "b": 2, "cost": -4.0 },
                    { "a": 2, "b": 3, "cost": 6.0 }
                ]
            }"#,
        )
        .unwrap();

        let store = FileEdgeStore::open(&path).unwrap();
        let records = store.load_all().await.unwrap();
        assert_eq!(records, vec![EdgeRecord { a: p(2), b: p(3), cost: 6.0 }]);
    }

    #[tokio::test]
    async fn test_rewrite_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.json");

        let store = FileEdgeStore::open(&path).unwrap();
        store.upsert(key(1, 2), 1.0).await.unwrap();
        store.upsert(key(1, 2), 2.0).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
