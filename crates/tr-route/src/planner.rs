//! Planner trait, default implementation, and batch planning.
//!
//! # Pluggability
//!
//! Callers plan through the [`Planner`] trait so alternative engines (A*,
//! contraction hierarchies) can be swapped in.  [`YenPlanner`] is the
//! default: Dijkstra for single routes and the Yen-style search in
//! [`crate::yen`] for alternatives.

use std::time::Duration;

use tr_core::{NodeId, Position};
use tr_graph::WaypointGraph;
use tr_ledger::DelaySource;

use crate::{CostModel, Deadline, EdgeCosts, PlanError, PlanResult, Route, dijkstra, yen};

/// Alternatives requested when the caller does not say.
pub const DEFAULT_K: usize = 3;

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Planner settings, typically loaded from the application's config file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    pub cost: CostModel,
    /// Number of alternatives for `k_shortest_routes`.
    pub k: usize,
    /// Per-query budget.  `None` means unbounded.
    pub timeout_ms: Option<u64>,
}

impl PlannerConfig {
    pub fn validate(&self) -> PlanResult<()> {
        self.cost.validate()?;
        if self.k == 0 {
            return Err(PlanError::InvalidInput("k must be at least 1".to_owned()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { cost: CostModel::DISTANCE, k: DEFAULT_K, timeout_ms: None }
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// `delays` is only consulted by delay-aware cost models and may be `None`
/// otherwise.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one planner can serve parallel
/// queries.
pub trait Planner: Send + Sync {
    fn shortest_path(
        &self,
        graph: &WaypointGraph,
        delays: Option<&dyn DelaySource>,
        from: NodeId,
        to: NodeId,
    ) -> PlanResult<Route>;

    fn k_shortest_routes(
        &self,
        graph: &WaypointGraph,
        delays: Option<&dyn DelaySource>,
        from: NodeId,
        to: NodeId,
        k: usize,
    ) -> PlanResult<Vec<Route>>;

    /// Snap two positions onto the graph, then plan `k` alternatives.
    ///
    /// # Errors
    ///
    /// [`PlanError::NotFound`] if the graph has no nodes.
    fn k_routes_between(
        &self,
        graph: &WaypointGraph,
        delays: Option<&dyn DelaySource>,
        from: Position,
        to: Position,
        k: usize,
    ) -> PlanResult<Vec<Route>> {
        let start = graph.closest_node(from).ok_or(PlanError::NotFound(from))?;
        let end = graph.closest_node(to).ok_or(PlanError::NotFound(to))?;
        self.k_shortest_routes(graph, delays, start, end, k)
    }
}

// ── YenPlanner ────────────────────────────────────────────────────────────────

/// Dijkstra + Yen-style alternatives under a [`PlannerConfig`].
#[derive(Clone, Debug, Default)]
pub struct YenPlanner {
    config: PlannerConfig,
}

impl YenPlanner {
    pub fn new(config: PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    fn prepare(
        &self,
        graph: &WaypointGraph,
        delays: Option<&dyn DelaySource>,
        nodes: [NodeId; 2],
    ) -> PlanResult<(EdgeCosts, Deadline)> {
        let deadline = Deadline::from_timeout(self.config.timeout());
        dijkstra::ensure_nodes(graph, &nodes)?;
        let costs = EdgeCosts::compute(graph, &self.config.cost, delays)?;
        Ok((costs, deadline))
    }
}

impl Planner for YenPlanner {
    fn shortest_path(
        &self,
        graph: &WaypointGraph,
        delays: Option<&dyn DelaySource>,
        from: NodeId,
        to: NodeId,
    ) -> PlanResult<Route> {
        let (costs, deadline) = self.prepare(graph, delays, [from, to])?;
        dijkstra::shortest_path(graph, &costs, from, to, &deadline)
    }

    fn k_shortest_routes(
        &self,
        graph: &WaypointGraph,
        delays: Option<&dyn DelaySource>,
        from: NodeId,
        to: NodeId,
        k: usize,
    ) -> PlanResult<Vec<Route>> {
        let (costs, deadline) = self.prepare(graph, delays, [from, to])?;
        yen::k_shortest_routes(graph, &costs, from, to, k, &deadline)
    }
}

// ── Batch planning ────────────────────────────────────────────────────────────

/// One origin/destination pair of a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlanRequest {
    pub from: NodeId,
    pub to: NodeId,
    pub k: usize,
}

/// Plan every request independently; results are in request order.
///
/// With the `parallel` feature the requests run on Rayon's thread pool.
/// Queries share `graph` and `delays` read-only.
pub fn plan_batch<P: Planner>(
    planner: &P,
    graph: &WaypointGraph,
    delays: Option<&dyn DelaySource>,
    requests: &[PlanRequest],
) -> Vec<PlanResult<Vec<Route>>> {
    let run = |r: &PlanRequest| planner.k_shortest_routes(graph, delays, r.from, r.to, r.k);

    #[cfg(not(feature = "parallel"))]
    {
        requests.iter().map(run).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests.par_iter().map(run).collect()
    }
}
