//! Dijkstra's algorithm over the CSR waypoint graph.
//!
//! The frontier is a min-heap of `(cost, NodeId)`.  Equal costs pop the
//! smaller `NodeId` first, which makes results reproducible.  The search
//! stops as soon as the target is popped (finalised), not when it is first
//! discovered.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use tr_core::{EdgeId, NodeId};
use tr_graph::WaypointGraph;

use crate::{Deadline, EdgeCosts, ExclusionSet, PlanError, PlanResult, Route};

/// Pops between deadline checks.
const DEADLINE_CHECK_INTERVAL: u32 = 256;

/// Reject node ids that do not belong to `graph`.
pub(crate) fn ensure_nodes(graph: &WaypointGraph, nodes: &[NodeId]) -> PlanResult<()> {
    match nodes.iter().find(|&&node| !graph.contains(node)) {
        Some(node) => Err(PlanError::InvalidInput(format!("{node} is not a node of this graph"))),
        None => Ok(()),
    }
}

/// Shortest `from → to` path avoiding `excluded` edges.
///
/// Returns `Ok(None)` when `to` is never finalised.  `from == to` yields
/// the trivial route.
///
/// # Errors
///
/// [`PlanError::InvalidInput`] if `from` or `to` is not a node of `graph`,
/// [`PlanError::Timeout`] if `deadline` expires mid-search.
pub fn search(
    graph: &WaypointGraph,
    costs: &EdgeCosts,
    excluded: &ExclusionSet,
    from: NodeId,
    to: NodeId,
    deadline: &Deadline,
) -> PlanResult<Option<Route>> {
    ensure_nodes(graph, &[from, to])?;
    if from == to {
        return Ok(Some(Route::trivial(from)));
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    let mut pops = 0u32;
    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        pops += 1;
        if pops % DEADLINE_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        if node == to {
            return Ok(Some(reconstruct(graph, &prev_edge, to, cost)));
        }

        for edge in graph.out_edges(node) {
            if excluded.contains(edge) {
                continue;
            }
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + costs.get(edge);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    Ok(None)
}

/// Unrestricted shortest path as a `Result`.
///
/// # Errors
///
/// [`PlanError::Unreachable`] when no path exists, [`PlanError::Timeout`]
/// when `deadline` expires.
pub fn shortest_path(
    graph: &WaypointGraph,
    costs: &EdgeCosts,
    from: NodeId,
    to: NodeId,
    deadline: &Deadline,
) -> PlanResult<Route> {
    match search(graph, costs, &ExclusionSet::new(), from, to, deadline)? {
        Some(route) => {
            log::debug!(
                "shortest path {from} -> {to}: {} nodes, {:.1} m, cost {:.2}",
                route.nodes.len(),
                route.distance_m,
                route.cost,
            );
            Ok(route)
        }
        None => {
            log::debug!("no path {from} -> {to}");
            Err(PlanError::Unreachable { from, to })
        }
    }
}

fn reconstruct(graph: &WaypointGraph, prev_edge: &[EdgeId], to: NodeId, cost: f64) -> Route {
    let mut nodes = vec![to];
    let mut distance_m = 0.0;
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        distance_m += graph.edge_length_m[e.index()];
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, distance_m, cost }
}
