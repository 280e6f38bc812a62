//! Shortest-path and route-cost computation over the cost graph's
//! neighbor index.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{GraphError, GraphResult};
use crate::graph::CostGraph;
use crate::model::PointId;

/// Pending queue entry for Dijkstra: tentative cost plus the sequence the
/// entry was enqueued at, so equal-cost ties pop in insertion order.
struct QueueEntry {
    cost: f64,
    seq: u64,
    point: PointId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the cheapest entry, then the
        // earliest-queued one, pops first. Costs are validated finite at the
        // mutation boundary, so partial_cmp cannot tie on NaN.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest path from `from` to `to` as the full point sequence, endpoints
/// included.
///
/// Single-source Dijkstra over `CostGraph::neighbors`. Both endpoints must
/// be registered (`PointNotFound` otherwise); a target with no connecting
/// edge chain fails with `Unreachable`. `from == to` yields the singleton
/// path.
pub fn shortest_path(graph: &CostGraph, from: PointId, to: PointId) -> GraphResult<Vec<PointId>> {
    graph.require_point(from)?;
    graph.require_point(to)?;
    if from == to {
        return Ok(vec![from]);
    }

    let mut dist: HashMap<PointId, f64> = HashMap::new();
    let mut prev: HashMap<PointId, PointId> = HashMap::new();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist.insert(from, 0.0);
    heap.push(QueueEntry {
        cost: 0.0,
        seq,
        point: from,
    });

    while let Some(QueueEntry { cost, point, .. }) = heap.pop() {
        // Stale entry: this point was already settled at a lower cost.
        if cost > dist.get(&point).copied().unwrap_or(f64::INFINITY) {
            continue;
        }
        if point == to {
            break;
        }
        for (neighbor, edge_cost) in graph.neighbors(point) {
            let candidate = cost + edge_cost;
            if candidate < dist.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                dist.insert(neighbor, candidate);
                prev.insert(neighbor, point);
                seq += 1;
                heap.push(QueueEntry {
                    cost: candidate,
                    seq,
                    point: neighbor,
                });
            }
        }
    }

    if !prev.contains_key(&to) {
        return Err(GraphError::Unreachable { from, to });
    }

    let mut path = vec![to];
    let mut cursor = to;
    while let Some(&step) = prev.get(&cursor) {
        path.push(step);
        cursor = step;
    }
    path.reverse();
    Ok(path)
}

/// Total cost of travelling `route` in order, summing the direct edge
/// between each consecutive pair.
///
/// A route of length zero or one costs nothing. A consecutive pair with no
/// stored edge fails with `MissingEdge`; on a freshly computed path that
/// signals cache/store divergence. Equal consecutive ids are malformed
/// input and fail with `InvalidArgument`.
pub fn route_cost(graph: &CostGraph, route: &[PointId]) -> GraphResult<f64> {
    let mut total = 0.0;
    for pair in route.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == b {
            return Err(GraphError::self_loop(a));
        }
        match graph.edge_cost(a, b) {
            Some(cost) => total += cost,
            None => return Err(GraphError::MissingEdge { a, b }),
        }
    }
    Ok(total)
}
