//! The immutable waypoint graph.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  Given
//! a `NodeId n`, its outgoing edges occupy the EdgeIds
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! of the edge arrays (`edge_from`, `edge_to`, `edge_length_m`), which are
//! sorted by source node.  Dijkstra's inner loop is a contiguous scan.
//!
//! Node identity lives in two parallel arrays indexed by `NodeId`:
//! `node_keys` (quantized identity) and `waypoints` (the full record).  A
//! hash index maps keys back to ids.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over waypoint positions answers nearest-node
//! queries, e.g. snapping a taxi's current location onto the graph.
//!
//! A built graph is never mutated.  Searches that need edges removed layer
//! their own exclusion set on top of it.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use tr_core::{EdgeId, NodeId, NodeKey, Position, Waypoint};

use crate::GraphConfig;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── BuildStats ────────────────────────────────────────────────────────────────

/// Counters collected while building, for diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes: usize,
    pub edges: usize,
    /// Samples or link endpoints that collapsed onto an existing key.
    pub merged_samples: usize,
    /// Lateral links to non-driving or opposite-direction lanes.
    pub skipped_lateral: usize,
    /// Edges whose two endpoints collapsed to the same key.
    pub dropped_self_loops: usize,
    /// Repeated `(from, to)` pairs; the first insertion wins.
    pub duplicate_edges: usize,
}

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Directed, lane-aware waypoint graph in CSR format plus a spatial index.
///
/// Do not construct directly; use [`GraphBuilder`](crate::GraphBuilder).
pub struct WaypointGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Quantized identity of each node.  Indexed by `NodeId`.
    pub node_keys: Vec<NodeKey>,
    /// Full waypoint record of each node (first sample seen for its key).
    pub waypoints: Vec<Waypoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    /// Euclidean length in metres, fixed at build time.
    pub edge_length_m: Vec<f64>,

    key_index: FxHashMap<NodeKey, NodeId>,
    spatial_idx: RTree<NodeEntry>,
    config: GraphConfig,
    stats: BuildStats,
}

impl WaypointGraph {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        node_keys: Vec<NodeKey>,
        waypoints: Vec<Waypoint>,
        node_out_start: Vec<u32>,
        edge_from: Vec<NodeId>,
        edge_to: Vec<NodeId>,
        edge_length_m: Vec<f64>,
        key_index: FxHashMap<NodeKey, NodeId>,
        config: GraphConfig,
        stats: BuildStats,
    ) -> Self {
        // Bulk-load for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| NodeEntry {
                point: [wp.position.x, wp.position.y],
                id: NodeId(i as u32),
            })
            .collect();

        Self {
            node_keys,
            waypoints,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            key_index,
            spatial_idx: RTree::bulk_load(entries),
            config,
            stats,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// An empty graph means "no route possible", not an error.
    pub fn is_empty(&self) -> bool {
        self.node_keys.is_empty()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn build_stats(&self) -> BuildStats {
        self.stats
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A dead-end node yields nothing.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `(target, length_m)` for every outgoing edge of `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.out_edges(node)
            .map(|e| (self.edge_to[e.index()], self.edge_length_m[e.index()]))
    }

    /// The edge `from → to`, if one exists.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    /// Sum of edge lengths along `nodes`, or `None` if some consecutive pair
    /// is not joined by an edge.  A single-node sequence has length 0.
    pub fn route_distance(&self, nodes: &[NodeId]) -> Option<f64> {
        nodes.windows(2).try_fold(0.0, |acc, pair| {
            self.find_edge(pair[0], pair[1])
                .map(|e| acc + self.edge_length_m[e.index()])
        })
    }

    // ── Identity lookups ──────────────────────────────────────────────────

    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    /// # Panics
    ///
    /// If `node` is not a node of this graph.
    #[inline]
    pub fn key_of(&self, node: NodeId) -> NodeKey {
        self.node_keys[node.index()]
    }

    /// Waypoint record usable for vehicle control.
    ///
    /// # Panics
    ///
    /// If `node` is not a node of this graph.
    #[inline]
    pub fn waypoint_of(&self, node: NodeId) -> &Waypoint {
        &self.waypoints[node.index()]
    }

    pub fn waypoint_by_key(&self, key: &NodeKey) -> Option<&Waypoint> {
        self.node_id(key).map(|id| self.waypoint_of(id))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos`.
    ///
    /// Equidistant candidates resolve to the smallest `NodeId`, i.e. the one
    /// inserted first.  Returns `None` only if the graph has no nodes.
    pub fn closest_node(&self, pos: Position) -> Option<NodeId> {
        let query = [pos.x, pos.y];
        let mut iter = self.spatial_idx.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best) = iter.next()?;
        let tied = iter
            .take_while(|(_, d)| *d == best)
            .map(|(e, _)| e.id)
            .min()
            .unwrap_or(first.id);
        Some(tied.min(first.id))
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Position, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}
