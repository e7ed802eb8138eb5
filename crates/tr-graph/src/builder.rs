//! Incremental graph construction.
//!
//! # Edge rules
//!
//! | Fact                     | Edges inserted                          |
//! |--------------------------|-----------------------------------------|
//! | `Forward`                | `from → to` and `to → from`             |
//! | `Lateral`, drivable      | `from → to` and `to → from`             |
//! | `Lateral`, not drivable  | none (counted in `skipped_lateral`)     |
//! | `Junction`               | `from → to` only                        |
//!
//! Both directions of a two-way fact are inserted as explicit edges; the
//! graph never treats an edge as implicitly symmetric.
//!
//! # Determinism
//!
//! Node ids follow first-seen order, the first waypoint seen for a key is
//! the one stored, and the first insertion of a `(from, to)` pair fixes its
//! length.  Feeding the same samples and links in the same order therefore
//! yields identical arrays.

use rustc_hash::{FxHashMap, FxHashSet};

use tr_core::{NodeId, NodeKey, TrError, Waypoint};

use crate::graph::{BuildStats, WaypointGraph};
use crate::{GraphConfig, GraphError, GraphResult, RoadLink};

struct RawEdge {
    from: NodeId,
    to: NodeId,
    length_m: f64,
}

/// Construct a [`WaypointGraph`] incrementally, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tr_core::{KeyResolution, Waypoint};
/// use tr_graph::{GraphBuilder, GraphConfig, RoadLink};
///
/// let config = GraphConfig::new(2.0, KeyResolution::default()).unwrap();
/// let mut b = GraphBuilder::new(config);
/// let a = Waypoint::at(0.0, 0.0).with_lane(1, -1);
/// let c = Waypoint::at(2.0, 0.0).with_lane(1, -1);
/// b.add_link(&RoadLink::forward(a, c)).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // forward links are two-way
/// ```
pub struct GraphBuilder {
    config: GraphConfig,
    keys: Vec<NodeKey>,
    waypoints: Vec<Waypoint>,
    key_index: FxHashMap<NodeKey, NodeId>,
    raw_edges: Vec<RawEdge>,
    seen_edges: FxHashSet<(NodeId, NodeId)>,
    stats: BuildStats,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            keys: Vec::new(),
            waypoints: Vec::new(),
            key_index: FxHashMap::default(),
            raw_edges: Vec::new(),
            seen_edges: FxHashSet::default(),
            stats: BuildStats::default(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(config: GraphConfig, nodes: usize, edges: usize) -> Self {
        let mut b = Self::new(config);
        b.keys.reserve(nodes);
        b.waypoints.reserve(nodes);
        b.key_index.reserve(nodes);
        b.raw_edges.reserve(edges);
        b.seen_edges.reserve(edges);
        b
    }

    /// Build a graph from a complete sample set and its connectivity facts.
    ///
    /// An empty sample set with no links yields an empty graph.
    pub fn from_samples<'a, S, L>(config: GraphConfig, samples: S, links: L) -> GraphResult<WaypointGraph>
    where
        S: IntoIterator<Item = &'a Waypoint>,
        L: IntoIterator<Item = &'a RoadLink>,
    {
        config.validate()?;
        let mut b = Self::new(config);
        for wp in samples {
            b.add_sample(wp)?;
        }
        for link in links {
            b.add_link(link)?;
        }
        Ok(b.build())
    }

    /// Intern a sample and return its `NodeId`.
    ///
    /// A sample whose key is already present returns the existing id; the
    /// stored waypoint record is not replaced.
    pub fn add_sample(&mut self, wp: &Waypoint) -> GraphResult<NodeId> {
        if !wp.position.is_finite() {
            return Err(TrError::NonFiniteCoordinate { x: wp.position.x, y: wp.position.y }.into());
        }
        let key = self.config.key_resolution.key_for(wp);
        if let Some(&id) = self.key_index.get(&key) {
            self.stats.merged_samples += 1;
            return Ok(id);
        }
        let id = NodeId(self.keys.len() as u32);
        self.keys.push(key);
        self.waypoints.push(wp.clone());
        self.key_index.insert(key, id);
        Ok(id)
    }

    /// Apply one connectivity fact.  Returns the number of edges inserted.
    pub fn add_link(&mut self, link: &RoadLink) -> GraphResult<usize> {
        if let crate::LinkKind::Lateral(change) = link.kind {
            if !change.is_drivable() {
                self.stats.skipped_lateral += 1;
                return Ok(0);
            }
        }

        let from = self.add_sample(&link.from)?;
        let to = self.add_sample(&link.to)?;
        if from == to {
            self.stats.dropped_self_loops += 1;
            return Ok(0);
        }

        // Length between the stored records, which may differ slightly from
        // the link's own endpoints when they merged onto existing keys.
        let length_m = self.waypoints[from.index()]
            .position
            .distance_m(self.waypoints[to.index()].position);

        let mut inserted = self.push_edge(from, to, length_m) as usize;
        if link.kind.is_two_way() {
            inserted += self.push_edge(to, from, length_m) as usize;
        }
        Ok(inserted)
    }

    /// Add a **directed** edge with an explicit length.
    ///
    /// Used by loaders and fixtures whose edge costs are not geometric.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> GraphResult<()> {
        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(GraphError::InvalidEdgeLength(length_m));
        }
        for node in [from, to] {
            if node.index() >= self.keys.len() {
                return Err(GraphError::NodeNotFound(node));
            }
        }
        if from == to {
            self.stats.dropped_self_loops += 1;
            return Ok(());
        }
        self.push_edge(from, to, length_m);
        Ok(())
    }

    /// Convenience: explicit edges in both directions.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) -> GraphResult<()> {
        self.add_directed_edge(a, b, length_m)?;
        self.add_directed_edge(b, a, length_m)
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> bool {
        if !self.seen_edges.insert((from, to)) {
            self.stats.duplicate_edges += 1;
            return false;
        }
        self.raw_edges.push(RawEdge { from, to, length_m });
        true
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`WaypointGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> WaypointGraph {
        let node_count = self.keys.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order within each adjacency list.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64> = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let stats = BuildStats { nodes: node_count, edges: edge_count, ..self.stats };
        log::info!(
            "built waypoint graph: {} nodes, {} edges (spacing {} m, key resolution {} m)",
            node_count,
            edge_count,
            self.config.sample_spacing_m,
            self.config.key_resolution.metres(),
        );
        log::debug!("graph build stats: {stats:?}");

        WaypointGraph::from_parts(
            self.keys,
            self.waypoints,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            self.key_index,
            self.config,
            stats,
        )
    }
}
