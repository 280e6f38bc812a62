//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use wayfare_core::{
    route_cost, shortest_path, CostGraph, EdgeStore, GraphAdmin, InMemoryRegistry, PointId,
    PointRegistry,
};
use wayfare_store::FileEdgeStore;

/// Everything one CLI invocation needs: the registry and graph, loaded
/// from the data directory, plus the path the point set saves back to.
struct Engine {
    registry: Arc<InMemoryRegistry>,
    graph: Arc<CostGraph>,
    points_path: PathBuf,
}

async fn open_engine(data_dir: &Path) -> anyhow::Result<Engine> {
    let registry = Arc::new(InMemoryRegistry::new());
    let points_path = wayfare_store::points_path(data_dir);
    for (id, name) in wayfare_store::load_points(&points_path)? {
        if let Err(err) = registry.restore(id, &name) {
            warn!("skipping saved point {}: {}", id, err);
        }
    }
    let store = Arc::new(FileEdgeStore::open(wayfare_store::edges_path(data_dir))?);
    let graph = Arc::new(CostGraph::new(
        Arc::clone(&registry) as Arc<dyn PointRegistry>,
        Arc::clone(&store) as Arc<dyn EdgeStore>,
    ));
    let merged = graph.load_from_store().await?;
    debug!(
        "engine ready: {} points, {} edges from {}",
        registry.len(),
        merged,
        store.path().display()
    );
    Ok(Engine {
        registry,
        graph,
        points_path,
    })
}

fn save_registry(engine: &Engine) -> anyhow::Result<()> {
    wayfare_store::save_points(&engine.points_path, &engine.registry.points())?;
    Ok(())
}

fn describe(engine: &Engine, p: PointId) -> String {
    match engine.registry.name(p) {
        Some(name) => format!("{} ({})", p, name),
        None => p.to_string(),
    }
}

pub async fn add_point(data_dir: PathBuf, name: String) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    let id = engine.registry.add(&name)?;
    save_registry(&engine)?;
    println!("Added point {} ({})", id, name.trim());
    Ok(())
}

pub async fn rename_point(data_dir: PathBuf, id: u64, name: String) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    engine.registry.rename(PointId(id), &name)?;
    save_registry(&engine)?;
    println!("Renamed point {} to {}", id, name.trim());
    Ok(())
}

pub async fn points(data_dir: PathBuf) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    let points = engine.registry.points();
    if points.is_empty() {
        println!("No points registered");
        return Ok(());
    }
    for (id, name) in points {
        println!("{:>6}  {}", id, name);
    }
    Ok(())
}

pub async fn remove_point(data_dir: PathBuf, id: u64) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    let admin = GraphAdmin::new(
        Arc::clone(&engine.graph),
        Arc::clone(&engine.registry) as Arc<dyn PointRegistry>,
    );
    admin.remove_point_and_edges(PointId(id)).await?;
    save_registry(&engine)?;
    println!("Removed point {} and its edges", id);
    Ok(())
}

pub async fn set_edge(data_dir: PathBuf, a: u64, b: u64, cost: f64) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    engine.graph.upsert_edge(PointId(a), PointId(b), cost).await?;
    println!("Edge {} <-> {} set to cost {}", a, b, cost);
    Ok(())
}

pub async fn clear_edge(data_dir: PathBuf, a: u64, b: u64) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    engine.graph.clear_edge(PointId(a), PointId(b)).await?;
    println!("Edge {} <-> {} cleared to cost 0", a, b);
    Ok(())
}

pub async fn edges(data_dir: PathBuf, id: u64) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    let edges = engine.graph.edges_from(PointId(id))?;
    if edges.is_empty() {
        println!("Point {} has no edges", id);
        return Ok(());
    }
    for edge in edges {
        println!(
            "{} -> {} ({})  cost {}",
            edge.from, edge.to, edge.to_name, edge.cost
        );
    }
    Ok(())
}

pub async fn path(data_dir: PathBuf, from: u64, to: u64) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    let route = shortest_path(&engine.graph, PointId(from), PointId(to))?;
    let total = route_cost(&engine.graph, &route)?;
    let labels: Vec<String> = route.iter().map(|p| describe(&engine, *p)).collect();
    println!("{}", labels.join(" -> "));
    println!("Total cost: {}", total);
    Ok(())
}

pub async fn cost(data_dir: PathBuf, route: Vec<u64>) -> anyhow::Result<()> {
    let engine = open_engine(&data_dir).await?;
    let route: Vec<PointId> = route.into_iter().map(PointId).collect();
    let total = route_cost(&engine.graph, &route)?;
    println!("Total cost: {}", total);
    Ok(())
}
