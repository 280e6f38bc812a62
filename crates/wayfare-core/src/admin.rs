//! Point removal coordinated with edge cleanup

use std::sync::Arc;

use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::CostGraph;
use crate::model::PointId;
use crate::registry::PointRegistry;

/// Couples point removal to edge purging so no edge ever survives pointing
/// at a retired id.
pub struct GraphAdmin {
    graph: Arc<CostGraph>,
    registry: Arc<dyn PointRegistry>,
}

impl GraphAdmin {
    pub fn new(graph: Arc<CostGraph>, registry: Arc<dyn PointRegistry>) -> Self {
        GraphAdmin { graph, registry }
    }

    /// Purge every edge touching `p`, then retire `p` from the registry.
    ///
    /// The purge runs to durable completion first. If it fails partway the
    /// removal aborts with `CleanupFailed`; the point stays registered and
    /// keeps whatever edges the purge left behind.
    pub async fn remove_point_and_edges(&self, p: PointId) -> GraphResult<()> {
        if !self.registry.exists(p) {
            return Err(GraphError::PointNotFound { id: p });
        }
        let purged = self
            .graph
            .purge_edges_touching(p)
            .await
            .map_err(|source| GraphError::cleanup_failed(p, source))?;
        self.registry.remove(p)?;
        debug!("point {} removed along with {} edges", p, purged);
        Ok(())
    }
}
