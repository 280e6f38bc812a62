//! Integration tests for Wayfare
//!
//! These tests drive the registry, graph, and file stores together
//! against a real data directory.

use std::sync::Arc;

use tempfile::TempDir;

use wayfare_core::{
    route_cost, shortest_path, CostGraph, GraphAdmin, GraphError, InMemoryRegistry, PointId,
    PointRegistry,
};
use wayfare_store::FileEdgeStore;

struct Harness {
    registry: Arc<InMemoryRegistry>,
    graph: Arc<CostGraph>,
}

/// Open the engine over `dir` the way the CLI does: restore saved points,
/// open the edge file, prime the cache.
async fn open_engine(dir: &TempDir) -> Harness {
    let registry = Arc::new(InMemoryRegistry::new());
    let points_path = wayfare_store::points_path(dir.path());
    for (id, name) in wayfare_store::load_points(&points_path).unwrap() {
        registry.restore(id, &name).unwrap();
    }
    let store = Arc::new(FileEdgeStore::open(wayfare_store::edges_path(dir.path())).unwrap());
    let graph = Arc::new(CostGraph::new(
        Arc::clone(&registry) as Arc<dyn PointRegistry>,
        store,
    ));
    graph.load_from_store().await.unwrap();
    Harness { registry, graph }
}

fn save_registry(dir: &TempDir, harness: &Harness) {
    wayfare_store::save_points(
        &wayfare_store::points_path(dir.path()),
        &harness.registry.points(),
    )
    .unwrap();
}

fn p(id: u64) -> PointId {
    PointId(id)
}

#[tokio::test]
async fn test_engine_round_trips_through_data_directory() {
    let dir = TempDir::new().unwrap();

    let first = open_engine(&dir).await;
    first.registry.add("harbor").unwrap();
    first.registry.add("market").unwrap();
    first.registry.add("mill").unwrap();
    save_registry(&dir, &first);
    first.graph.upsert_edge(p(1), p(2), 4.0).await.unwrap();
    first.graph.upsert_edge(p(2), p(3), 1.5).await.unwrap();
    drop(first);

    let second = open_engine(&dir).await;
    assert_eq!(second.registry.len(), 3);
    assert_eq!(second.registry.name(p(1)).as_deref(), Some("harbor"));
    assert_eq!(second.graph.edge_count(), 2);
    assert_eq!(second.graph.edge_cost(p(1), p(2)), Some(4.0));
    assert_eq!(second.graph.neighbors(p(2)), vec![(p(1), 4.0), (p(3), 1.5)]);
}

#[tokio::test]
async fn test_point_removal_cascades_into_saved_edges() {
    let dir = TempDir::new().unwrap();

    let first = open_engine(&dir).await;
    for name in ["hub", "north", "south"] {
        first.registry.add(name).unwrap();
    }
    first.graph.upsert_edge(p(1), p(2), 1.0).await.unwrap();
    first.graph.upsert_edge(p(1), p(3), 2.0).await.unwrap();
    first.graph.upsert_edge(p(2), p(3), 9.0).await.unwrap();

    let admin = GraphAdmin::new(
        Arc::clone(&first.graph),
        Arc::clone(&first.registry) as Arc<dyn PointRegistry>,
    );
    admin.remove_point_and_edges(p(1)).await.unwrap();
    save_registry(&dir, &first);
    drop(first);

    let second = open_engine(&dir).await;
    assert!(!second.registry.exists(p(1)));
    assert_eq!(second.registry.len(), 2);
    assert_eq!(second.graph.edge_count(), 1);
    assert_eq!(second.graph.edge_cost(p(2), p(3)), Some(9.0));
    assert!(second.graph.neighbors(p(2)).iter().all(|(n, _)| *n != p(1)));

    // The retired id is gone for good; routing through it fails.
    let err = shortest_path(&second.graph, p(2), p(1)).unwrap_err();
    assert!(matches!(err, GraphError::PointNotFound { id } if id == p(1)));
}

#[tokio::test]
async fn test_cheapest_route_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let first = open_engine(&dir).await;
    for name in ["a", "b", "c", "d"] {
        first.registry.add(name).unwrap();
    }
    save_registry(&dir, &first);
    for (a, b, cost) in [
        (1, 2, 2.0),
        (1, 3, 3.0),
        (2, 3, 5.0),
        (2, 4, 10.0),
        (1, 4, 11.0),
    ] {
        first.graph.upsert_edge(p(a), p(b), cost).await.unwrap();
    }
    drop(first);

    let second = open_engine(&dir).await;
    let route = shortest_path(&second.graph, p(1), p(4)).unwrap();
    assert_eq!(route, vec![p(1), p(4)]);
    assert_eq!(route_cost(&second.graph, &route).unwrap(), 11.0);
}

#[tokio::test]
async fn test_cleared_edge_stays_cleared_after_reopen() {
    let dir = TempDir::new().unwrap();

    let first = open_engine(&dir).await;
    first.registry.add("harbor").unwrap();
    first.registry.add("market").unwrap();
    save_registry(&dir, &first);
    first.graph.upsert_edge(p(1), p(2), 6.0).await.unwrap();
    first.graph.clear_edge(p(1), p(2)).await.unwrap();
    drop(first);

    let second = open_engine(&dir).await;
    assert_eq!(second.graph.edge_count(), 1);
    assert_eq!(second.graph.edge_cost(p(1), p(2)), Some(0.0));
    let route = shortest_path(&second.graph, p(1), p(2)).unwrap();
    assert_eq!(route_cost(&second.graph, &route).unwrap(), 0.0);
}
