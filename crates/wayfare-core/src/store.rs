//! Durable edge storage seam.
//!
//! The engine treats storage as a narrow read/write contract: load
//! everything once at startup, then write every mutation through before it
//! becomes visible in the cache. Retry policy and timeouts belong to the
//! store implementation or its caller, never to the engine.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{StoreError, StoreResult};
use crate::model::{EdgeKey, EdgeRecord, PointId};

/// Durable key-value persistence for edges.
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Every stored edge. Called once at startup to prime the cache.
    async fn load_all(&self) -> StoreResult<Vec<EdgeRecord>>;

    /// Insert or replace the cost stored for a pair.
    async fn upsert(&self, key: EdgeKey, cost: f64) -> StoreResult<()>;

    /// Delete every edge with `p` as either endpoint. Returns how many rows
    /// were deleted.
    async fn delete_where_endpoint(&self, p: PointId) -> StoreResult<usize>;

    /// Stored cost for a pair, if any.
    async fn find_pair(&self, key: EdgeKey) -> StoreResult<Option<f64>>;
}

/// In-memory `EdgeStore`, used by unit tests and as the reference
/// implementation of the contract. Failure injection makes write-through
/// behavior testable.
pub struct MemoryEdgeStore {
    edges: DashMap<EdgeKey, f64>,
    failing: AtomicBool,
}

impl MemoryEdgeStore {
    pub fn new() -> Self {
        MemoryEdgeStore {
            edges: DashMap::new(),
            failing: AtomicBool::new(false),
        }
    }

    /// When set, every subsequent call fails with `Rejected`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected {
                reason: "injected store failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EdgeStore for MemoryEdgeStore {
    async fn load_all(&self) -> StoreResult<Vec<EdgeRecord>> {
        self.check_available()?;
        let mut pairs: Vec<(EdgeKey, f64)> = self
            .edges
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        pairs.sort_by_key(|(key, _)| *key);
        Ok(pairs
            .into_iter()
            .map(|(key, cost)| EdgeRecord::new(key, cost))
            .collect())
    }

    async fn upsert(&self, key: EdgeKey, cost: f64) -> StoreResult<()> {
        self.check_available()?;
        self.edges.insert(key, cost);
        Ok(())
    }

    async fn delete_where_endpoint(&self, p: PointId) -> StoreResult<usize> {
        self.check_available()?;
        let doomed: Vec<EdgeKey> = self
            .edges
            .iter()
            .map(|entry| *entry.key())
            .filter(|key| key.touches(p))
            .collect();
        for key in &doomed {
            self.edges.remove(key);
        }
        Ok(doomed.len())
    }

    async fn find_pair(&self, key: EdgeKey) -> StoreResult<Option<f64>> {
        self.check_available()?;
        Ok(self.edges.get(&key).map(|cost| *cost))
    }
}

impl Default for MemoryEdgeStore {
    fn default() -> Self {
        Self::new()
    }
}
