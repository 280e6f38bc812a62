//! Persistence for the registered point set.
//!
//! Same shape as the edge file: one JSON document, rewritten whole through
//! a temp file and a rename.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use wayfare_core::{PointId, StoreResult};

#[derive(Debug, Serialize, Deserialize)]
struct PointFile {
    version: String,
    saved_at: String,
    points: Vec<PointEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PointEntry {
    id: PointId,
    name: String,
}

/// Read the saved point set. A missing file is an empty set; entries with
/// an out-of-range id or a blank name are skipped with a warning.
pub fn load_points(path: &Path) -> StoreResult<Vec<(PointId, String)>> {
    let json_str = match std::fs::read_to_string(path) {
        Ok(json_str) => json_str,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("point file {} does not exist yet", path.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };
    let file: PointFile = serde_json::from_str(&json_str)?;
    let mut out = Vec::with_capacity(file.points.len());
    for entry in file.points {
        if entry.id.0 == 0 || entry.id.0 == u64::MAX || entry.name.trim().is_empty() {
            warn!("skipping malformed saved point entry (id {})", entry.id);
            continue;
        }
        out.push((entry.id, entry.name));
    }
    debug!("loaded {} points from {}", out.len(), path.display());
    Ok(out)
}

/// Rewrite the saved point set.
pub fn save_points(path: &Path, points: &[(PointId, String)]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = PointFile {
        version: env!("CARGO_PKG_VERSION").to_string(),
        saved_at: chrono::Utc::now().to_rfc3339(),
        points: points
            .iter()
            .map(|(id, name)| PointEntry {
                id: *id,
                name: name.clone(),
            })
            .collect(),
    };
    let json_str = serde_json::to_string_pretty(&file)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json_str)?;
    std::fs::rename(&tmp, path)?;
    debug!("point file saved: {}", path.display());
    Ok(())
}
