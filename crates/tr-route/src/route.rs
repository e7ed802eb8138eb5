//! Planned routes.

use tr_core::{NodeId, NodeKey, Waypoint};
use tr_graph::WaypointGraph;

use crate::EdgeCosts;

/// An ordered node sequence through the graph that produced it.
///
/// Every consecutive pair is joined by an edge of that graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    /// Sum of edge lengths, in metres.
    pub distance_m: f64,
    /// Sum of edge costs under the query's cost model.
    pub cost: f64,
}

impl Route {
    /// The zero-length route that starts and ends at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], distance_m: 0.0, cost: 0.0 }
    }

    /// Re-derive distance and cost of `nodes` from the graph.
    ///
    /// Returns `None` if some consecutive pair is not an edge.
    pub fn from_nodes(graph: &WaypointGraph, costs: &EdgeCosts, nodes: Vec<NodeId>) -> Option<Self> {
        let mut distance_m = 0.0;
        let mut cost = 0.0;
        for pair in nodes.windows(2) {
            let e = graph.find_edge(pair[0], pair[1])?;
            distance_m += graph.edge_length_m[e.index()];
            cost += costs.get(e);
        }
        (!nodes.is_empty()).then_some(Self { nodes, distance_m, cost })
    }

    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// `true` if no node appears twice.
    pub fn is_loopless(&self) -> bool {
        is_loopless(&self.nodes)
    }

    /// Stable node identities, e.g. for ledger updates.
    pub fn keys(&self, graph: &WaypointGraph) -> Vec<NodeKey> {
        self.nodes.iter().map(|&n| graph.key_of(n)).collect()
    }

    /// Waypoint records for the route-execution collaborator.
    pub fn waypoints<'g>(&self, graph: &'g WaypointGraph) -> Vec<&'g Waypoint> {
        self.nodes.iter().map(|&n| graph.waypoint_of(n)).collect()
    }
}

/// A pending alternative in the k-shortest search.
#[derive(Debug, Clone)]
pub struct RouteCandidate {
    pub route: Route,
    /// Number of leading nodes shared with the route it was spurred from.
    pub root_len: usize,
}

pub(crate) fn is_loopless(nodes: &[NodeId]) -> bool {
    let mut seen = rustc_hash::FxHashSet::default();
    nodes.iter().all(|n| seen.insert(*n))
}
