//! The in-memory cost graph: a write-through mirror of the durable edge
//! store, validated against the point registry.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::model::{EdgeKey, PointId, TravelEdge};
use crate::registry::PointRegistry;
use crate::store::EdgeStore;

/// Undirected weighted graph over registered points.
///
/// `edges` is the authoritative cache, keyed by canonical pair. `adjacency`
/// is its symmetric closure, kept incrementally so neighbor queries cost
/// O(degree) instead of O(|edges|). Mutations write through to the edge
/// store first; a failed store call leaves both maps untouched.
///
/// # Lock ordering
///
/// Writers hold the `edges` entry guard for the canonical key while fixing
/// up both `adjacency` sides, so concurrent writers to the same pair
/// serialize. Readers do not take `edges` guards, so each entry they read
/// is the old value or the new one, never a torn one, but between a
/// writer's two `adjacency` inserts one direction of the pair can briefly
/// show the update before the other.
/// `adjacency` guards are only ever taken while holding an `edges` guard or
/// holding nothing; the store round trip always completes before either
/// lock is touched. Read paths take a single guard at a time and clone out.
pub struct CostGraph {
    registry: Arc<dyn PointRegistry>,
    store: Arc<dyn EdgeStore>,
    edges: DashMap<EdgeKey, f64>,
    adjacency: DashMap<PointId, HashMap<PointId, f64>>,
}

impl CostGraph {
    pub fn new(registry: Arc<dyn PointRegistry>, store: Arc<dyn EdgeStore>) -> Self {
        CostGraph {
            registry,
            store,
            edges: DashMap::new(),
            adjacency: DashMap::new(),
        }
    }

    /// Full resynchronization from the edge store, merging without
    /// overwriting pairs already cached (first writer wins). Returns how
    /// many edges were merged. Called once at startup.
    pub async fn load_from_store(&self) -> GraphResult<usize> {
        let records = self.store.load_all().await?;
        let mut merged = 0;
        for record in records {
            if !record.cost.is_finite() || record.cost < 0.0 {
                warn!(
                    "skipping stored edge {} <-> {} with bad cost {}",
                    record.a, record.b, record.cost
                );
                continue;
            }
            let Ok(key) = EdgeKey::new(record.a, record.b) else {
                warn!("skipping stored self-loop on point {}", record.a);
                continue;
            };
            if self.apply_if_vacant(key, record.cost) {
                merged += 1;
            }
        }
        debug!("merged {} edges from store", merged);
        Ok(merged)
    }

    /// Create or replace the edge between `a` and `b`.
    ///
    /// Rejects equal endpoints and negative or non-finite costs with
    /// `InvalidArgument`, unknown endpoints with `PointNotFound`. The store
    /// write must succeed before the cache changes.
    pub async fn upsert_edge(&self, a: PointId, b: PointId, cost: f64) -> GraphResult<()> {
        let cost = validated_cost(cost)?;
        let key = EdgeKey::new(a, b)?;
        self.require_point(a)?;
        self.require_point(b)?;
        self.store.upsert(key, cost).await?;
        self.apply(key, cost);
        debug!("edge {} upserted at cost {}", key, cost);
        Ok(())
    }

    /// Reset the stored cost of an existing edge to zero. The edge stays in
    /// the graph and remains traversable for free; it does not disappear.
    ///
    /// Clearing a pair with no stored edge fails with `MissingEdge`. A pair
    /// the store knows but the cache does not (divergence) is healed by
    /// zero-writing it through.
    pub async fn clear_edge(&self, a: PointId, b: PointId) -> GraphResult<()> {
        let key = EdgeKey::new(a, b)?;
        self.require_point(a)?;
        self.require_point(b)?;
        if !self.edges.contains_key(&key) {
            if self.store.find_pair(key).await?.is_none() {
                return Err(GraphError::MissingEdge { a, b });
            }
            warn!("edge {} present in store but missing from cache", key);
        }
        self.store.upsert(key, 0.0).await?;
        self.apply(key, 0.0);
        debug!("edge {} cost cleared", key);
        Ok(())
    }

    /// Current one-hop neighbors of `p` with their edge costs, sorted by
    /// neighbor id. Empty for isolated or unknown points; does not consult
    /// the registry.
    pub fn neighbors(&self, p: PointId) -> Vec<(PointId, f64)> {
        let mut out: Vec<(PointId, f64)> = self
            .adjacency
            .get(&p)
            .map(|set| set.iter().map(|(n, c)| (*n, *c)).collect())
            .unwrap_or_default();
        out.sort_by_key(|(n, _)| *n);
        out
    }

    /// Edges leaving `p`, with neighbor names resolved. Fails with
    /// `PointNotFound` for an unregistered `p`; neighbors whose ids are no
    /// longer registered are skipped rather than reported, since a stale
    /// cache entry can linger briefly while a removal is in flight.
    pub fn edges_from(&self, p: PointId) -> GraphResult<Vec<TravelEdge>> {
        self.require_point(p)?;
        let mut out = Vec::new();
        for (to, cost) in self.neighbors(p) {
            let Some(to_name) = self.registry.name(to) else {
                continue;
            };
            out.push(TravelEdge {
                from: p,
                to,
                cost,
                to_name,
            });
        }
        Ok(out)
    }

    /// Stored cost of the direct edge between `a` and `b`, if one exists.
    pub fn edge_cost(&self, a: PointId, b: PointId) -> Option<f64> {
        let key = EdgeKey::new(a, b).ok()?;
        self.edges.get(&key).map(|cost| *cost)
    }

    /// Remove every edge touching `p` from the store, the cache, and the
    /// adjacency index. Returns how many cached edges were dropped. The
    /// graph admin calls this before a point leaves the registry.
    pub async fn purge_edges_touching(&self, p: PointId) -> GraphResult<usize> {
        let deleted = self.store.delete_where_endpoint(p).await?;
        let Some((_, neighbors)) = self.adjacency.remove(&p) else {
            debug!("no cached edges touch point {}", p);
            return Ok(0);
        };
        let mut removed = 0;
        for (n, _) in neighbors {
            let Ok(key) = EdgeKey::new(p, n) else {
                continue;
            };
            if self.edges.remove(&key).is_some() {
                removed += 1;
            }
            if let Some(mut peer) = self.adjacency.get_mut(&n) {
                peer.remove(&p);
            }
            self.adjacency.remove_if(&n, |_, peer| peer.is_empty());
        }
        debug!(
            "purged {} cached edges touching point {} ({} store rows)",
            removed, p, deleted
        );
        Ok(removed)
    }

    /// Number of edges currently cached.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn require_point(&self, id: PointId) -> GraphResult<()> {
        if self.registry.exists(id) {
            Ok(())
        } else {
            Err(GraphError::PointNotFound { id })
        }
    }

    /// Apply a persisted edge to both maps. Holds the `edges` entry guard
    /// across the adjacency fix-up; see the lock ordering note above.
    fn apply(&self, key: EdgeKey, cost: f64) {
        let mut slot = self.edges.entry(key).or_insert(cost);
        *slot = cost;
        self.adjacency
            .entry(key.lo())
            .or_default()
            .insert(key.hi(), cost);
        self.adjacency
            .entry(key.hi())
            .or_default()
            .insert(key.lo(), cost);
    }

    /// Like `apply`, but leaves an already-cached pair alone. Returns
    /// whether the edge was inserted.
    fn apply_if_vacant(&self, key: EdgeKey, cost: f64) -> bool {
        match self.edges.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let guard = slot.insert(cost);
                self.adjacency
                    .entry(key.lo())
                    .or_default()
                    .insert(key.hi(), cost);
                self.adjacency
                    .entry(key.hi())
                    .or_default()
                    .insert(key.lo(), cost);
                drop(guard);
                true
            }
        }
    }
}

fn validated_cost(cost: f64) -> GraphResult<f64> {
    if !cost.is_finite() {
        return Err(GraphError::non_finite_cost(cost));
    }
    if cost < 0.0 {
        return Err(GraphError::negative_cost(cost));
    }
    Ok(cost)
}

impl std::fmt::Debug for CostGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostGraph")
            .field("edge_count", &self.edges.len())
            .field("indexed_points", &self.adjacency.len())
            .finish()
    }
}
