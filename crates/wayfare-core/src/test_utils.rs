//! Test fixtures for the cost graph engine

use std::sync::Arc;

use crate::graph::CostGraph;
use crate::model::PointId;
use crate::registry::{InMemoryRegistry, PointRegistry};
use crate::store::{EdgeStore, MemoryEdgeStore};

/// Registry, store, and graph wired together for a test.
pub struct EngineFixture {
    pub registry: Arc<InMemoryRegistry>,
    pub store: Arc<MemoryEdgeStore>,
    pub graph: Arc<CostGraph>,
}

/// Fixture with one registered point per name, ids 1..=names.len() in order.
pub fn engine_with_points(names: &[&str]) -> EngineFixture {
    let registry = Arc::new(InMemoryRegistry::new());
    for name in names {
        registry.add(name).expect("register fixture point");
    }
    let store = Arc::new(MemoryEdgeStore::new());
    let graph = Arc::new(CostGraph::new(
        Arc::clone(&registry) as Arc<dyn PointRegistry>,
        Arc::clone(&store) as Arc<dyn EdgeStore>,
    ));
    EngineFixture {
        registry,
        store,
        graph,
    }
}

/// Fixture with points and a seeded edge set, written through the engine.
pub async fn engine_with_edges(names: &[&str], edges: &[(u64, u64, f64)]) -> EngineFixture {
    let fixture = engine_with_points(names);
    for (a, b, cost) in edges {
        fixture
            .graph
            .upsert_edge(p(*a), p(*b), *cost)
            .await
            .expect("seed fixture edge");
    }
    fixture
}

pub fn p(id: u64) -> PointId {
    PointId(id)
}
