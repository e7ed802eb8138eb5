//! Edge exclusion layered over an immutable graph.

use rustc_hash::FxHashSet;

use tr_core::{EdgeId, NodeId};
use tr_graph::WaypointGraph;

use crate::Route;

/// A private set of edges a search must treat as absent.
///
/// The base graph is never touched; each spur search builds its own set.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
    edges: FxHashSet<EdgeId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusions for a spur search rooted at `root`.
    ///
    /// For every known route that starts with exactly `root` and continues
    /// past it, the edge it takes out of `root`'s last node is excluded.  No
    /// node is removed and no other edge is touched.
    pub fn for_root(graph: &WaypointGraph, known: &[Route], root: &[NodeId]) -> Self {
        let mut set = Self::new();
        let Some(&spur) = root.last() else {
            return set;
        };
        for route in known {
            if route.nodes.len() > root.len() && route.nodes.starts_with(root) {
                if let Some(e) = graph.find_edge(spur, route.nodes[root.len()]) {
                    set.exclude(e);
                }
            }
        }
        set
    }

    pub fn exclude(&mut self, edge: EdgeId) {
        self.edges.insert(edge);
    }

    #[inline]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
