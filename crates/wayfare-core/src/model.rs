//! Core data structures for the cost graph

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Identifier of a point, minted and owned by the point registry.
///
/// The graph engine only ever references ids; it never creates or retires
/// one. Ids are positive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical key for an undirected edge: the endpoint pair ordered
/// `lo < hi`, so each pair has exactly one stored representation.
///
/// The fields are private and the only constructor rejects equal endpoints,
/// which makes both canonical ordering and the no-self-loop rule type-level
/// invariants rather than runtime conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    lo: PointId,
    hi: PointId,
}

impl EdgeKey {
    /// Build the canonical key for the pair `{a, b}`.
    ///
    /// Fails with `InvalidArgument` when `a == b`.
    pub fn new(a: PointId, b: PointId) -> Result<Self, GraphError> {
        if a == b {
            return Err(GraphError::self_loop(a));
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Ok(EdgeKey { lo, hi })
    }

    /// The smaller endpoint.
    pub fn lo(&self) -> PointId {
        self.lo
    }

    /// The larger endpoint.
    pub fn hi(&self) -> PointId {
        self.hi
    }

    /// Whether `p` is one of the two endpoints.
    pub fn touches(&self, p: PointId) -> bool {
        self.lo == p || self.hi == p
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.lo, self.hi)
    }
}

/// Wire form of one stored edge, as the edge store reads and writes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub a: PointId,
    pub b: PointId,
    pub cost: f64,
}

impl EdgeRecord {
    /// Record for a canonical key, endpoints in canonical order.
    pub fn new(key: EdgeKey, cost: f64) -> Self {
        EdgeRecord {
            a: key.lo(),
            b: key.hi(),
            cost,
        }
    }
}

/// One hop out of a point, with the neighbor's display name resolved
/// against the registry. Returned by `CostGraph::edges_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelEdge {
    pub from: PointId,
    pub to: PointId,
    pub cost: f64,
    pub to_name: String,
}
