//! Point registry: the authoritative owner of point ids and names

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::error::{GraphError, GraphResult};
use crate::model::PointId;

/// Read/remove surface the graph engine consumes. Implementations must not
/// block: the engine calls `exists`/`name` on its non-blocking read paths.
pub trait PointRegistry: Send + Sync {
    /// Whether `id` currently names a registered point.
    fn exists(&self, id: PointId) -> bool;

    /// Display name of `id`, if registered.
    fn name(&self, id: PointId) -> Option<String>;

    /// Retire a point. Callers must have purged its edges first; the graph
    /// admin enforces that ordering.
    fn remove(&self, id: PointId) -> GraphResult<()>;
}

/// In-memory registry. Thread-safe for concurrent access.
pub struct InMemoryRegistry {
    points: DashMap<PointId, String>,
    next_id: AtomicU64,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        InMemoryRegistry {
            points: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new point under a fresh id.
    pub fn add(&self, name: &str) -> GraphResult<PointId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GraphError::empty_name());
        }
        let id = PointId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.points.insert(id, name.to_string());
        Ok(id)
    }

    /// Change the display name of an existing point.
    pub fn rename(&self, id: PointId, name: &str) -> GraphResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GraphError::empty_name());
        }
        match self.points.get_mut(&id) {
            Some(mut entry) => {
                *entry = name.to_string();
                Ok(())
            }
            None => Err(GraphError::PointNotFound { id }),
        }
    }

    /// Re-register a point under a known id, used when reloading a persisted
    /// point set. Advances the id counter past `id`, so `id` must lie in
    /// `1..u64::MAX`.
    pub fn restore(&self, id: PointId, name: &str) -> GraphResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GraphError::empty_name());
        }
        if id.0 == 0 || id.0 == u64::MAX {
            return Err(GraphError::InvalidArgument {
                reason: format!("point id {id} is out of range"),
            });
        }
        if self.points.contains_key(&id) {
            return Err(GraphError::InvalidArgument {
                reason: format!("point {id} is already registered"),
            });
        }
        self.points.insert(id, name.to_string());
        self.next_id.fetch_max(id.0 + 1, Ordering::SeqCst);
        Ok(())
    }

    /// All registered points, sorted by id.
    pub fn points(&self) -> Vec<(PointId, String)> {
        let mut out: Vec<(PointId, String)> = self
            .points
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl PointRegistry for InMemoryRegistry {
    fn exists(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    fn name(&self, id: PointId) -> Option<String> {
        self.points.get(&id).map(|entry| entry.value().clone())
    }

    fn remove(&self, id: PointId) -> GraphResult<()> {
        match self.points.remove(&id) {
            Some(_) => Ok(()),
            None => Err(GraphError::PointNotFound { id }),
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
