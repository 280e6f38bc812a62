//! Travel-cost graph engine: write-through edge cache, Dijkstra path
//! finding, and point-removal cleanup

pub mod admin;
pub mod error;
pub mod graph;
pub mod model;
pub mod path;
pub mod registry;
pub mod store;


#[cfg(test)]
pub mod test_utils;

pub use admin::GraphAdmin;
pub use error::{GraphError, GraphResult, StoreError, StoreResult};
pub use graph::CostGraph;
pub use model::{EdgeKey, EdgeRecord, PointId, TravelEdge};
pub use path::{route_cost, shortest_path};
pub use registry::{InMemoryRegistry, PointRegistry};
pub use store::{EdgeStore, MemoryEdgeStore};
