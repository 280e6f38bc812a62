//! Error types for the cost graph engine.
//!
//! Every failure is reported to the immediate caller; nothing is swallowed
//! or retried inside the engine. A mutation that fails validation or whose
//! store write is refused leaves the in-memory graph untouched.

use thiserror::Error;

use crate::model::PointId;

/// Errors raised by graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed input reached the engine: equal endpoint ids, a negative or
    /// non-finite cost, an empty point name. Rejected before any mutation.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A referenced point is not currently known to the registry.
    #[error("point {id} is not registered")]
    PointNotFound { id: PointId },

    /// A required edge has no stored cost. On a route-cost computation this
    /// signals cache/store divergence and is a defect, not a normal flow.
    #[error("no edge between {a} and {b}")]
    MissingEdge { a: PointId, b: PointId },

    /// No chain of edges connects the two points.
    #[error("no route from {from} to {to}")]
    Unreachable { from: PointId, to: PointId },

    /// The durable edge store refused the call. The in-memory cache was not
    /// changed; retry policy belongs to the caller.
    #[error("edge store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Edge purge during point removal did not complete; the point and its
    /// remaining edges were left intact.
    #[error("cleanup for point {point} did not complete: {source}")]
    CleanupFailed {
        point: PointId,
        #[source]
        source: Box<GraphError>,
    },
}

impl GraphError {
    pub fn self_loop(id: PointId) -> Self {
        GraphError::InvalidArgument {
            reason: format!("edge endpoints must differ (got {id} on both ends)"),
        }
    }

    pub fn negative_cost(cost: f64) -> Self {
        GraphError::InvalidArgument {
            reason: format!("edge cost must be non-negative (got {cost})"),
        }
    }

    pub fn non_finite_cost(cost: f64) -> Self {
        GraphError::InvalidArgument {
            reason: format!("edge cost must be finite (got {cost})"),
        }
    }

    pub fn empty_name() -> Self {
        GraphError::InvalidArgument {
            reason: "point name must not be empty".to_string(),
        }
    }

    pub fn cleanup_failed(point: PointId, source: GraphError) -> Self {
        GraphError::CleanupFailed {
            point,
            source: Box::new(source),
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised at the durable-storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("edge store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("edge store data is malformed: {0}")]
    Format(#[from] serde_json::Error),

    /// The store refused the operation for an integrity reason.
    #[error("edge store rejected the operation: {reason}")]
    Rejected { reason: String },
}

/// Result type for edge store operations.
pub type StoreResult<T> = Result<T, StoreError>;
