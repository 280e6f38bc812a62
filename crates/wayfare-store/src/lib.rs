//! JSON-file persistence for the travel-cost graph

use std::path::{Path, PathBuf};

pub mod file;
pub mod points;

pub use file::FileEdgeStore;
pub use points::{load_points, save_points};

/// Edge file name inside the data directory
pub const EDGES_FILE: &str = "edges.json";

/// Point file name inside the data directory
pub const POINTS_FILE: &str = "points.json";

/// Path of the edge file under `data_dir`
pub fn edges_path(data_dir: &Path) -> PathBuf {
    data_dir.join(EDGES_FILE)
}

/// Path of the point file under `data_dir`
pub fn points_path(data_dir: &Path) -> PathBuf {
    data_dir.join(POINTS_FILE)
}
