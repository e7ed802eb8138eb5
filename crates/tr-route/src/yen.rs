//! K shortest loopless routes, Yen-style.
//!
//! # Procedure
//!
//! 1. Route 1 is the shortest path.  If there is none the result is empty.
//! 2. After each accepted route, every node of it except the last becomes a
//!    spur node.  The root is the prefix up to and including the spur node.
//!    An [`ExclusionSet`] removes, for every accepted route sharing that
//!    exact root, the edge it takes out of the spur node.  The spur path is
//!    the shortest spur → target path avoiding those edges, and the
//!    candidate is `root[..spur] ++ spur_path`.
//! 3. Candidates with a repeated node, or whose node sequence equals an
//!    accepted or pending route, are discarded.
//! 4. The pending candidate with the smallest total distance (recomputed on
//!    the unmodified graph) is accepted next.  Stop at `k` routes or when
//!    nothing is pending.
//!
//! Only the newest route's spurs are searched each round.  An older route
//! whose root the newest route does not share would repeat a search whose
//! exclusions have not changed; one whose root it does share is the same
//! search as the newest route's spur at that position.
//!
//! Root nodes are not removed from spur searches, so this is a heuristic:
//! a spur path that wanders back into its root is dropped rather than
//! replaced by the best loopless alternative, and the returned set is not
//! guaranteed to be the true k shortest.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use tr_core::NodeId;
use tr_graph::WaypointGraph;

use crate::dijkstra::{ensure_nodes, search};
use crate::route::is_loopless;
use crate::{Deadline, EdgeCosts, ExclusionSet, PlanError, PlanResult, Route, RouteCandidate};

/// Up to `k` distinct loopless routes `from → to`.
///
/// The first route is the shortest path under `costs`; the rest follow in
/// non-decreasing distance order.  An unreachable target yields an empty
/// vector.
///
/// # Errors
///
/// [`PlanError::InvalidInput`] for `k == 0` or an endpoint outside `graph`,
/// [`PlanError::Timeout`] when `deadline` expires.
pub fn k_shortest_routes(
    graph: &WaypointGraph,
    costs: &EdgeCosts,
    from: NodeId,
    to: NodeId,
    k: usize,
    deadline: &Deadline,
) -> PlanResult<Vec<Route>> {
    if k == 0 {
        return Err(PlanError::InvalidInput("k must be at least 1".to_owned()));
    }
    ensure_nodes(graph, &[from, to])?;

    let Some(first) = search(graph, costs, &ExclusionSet::new(), from, to, deadline)? else {
        log::debug!("k-shortest {from} -> {to}: unreachable");
        return Ok(Vec::new());
    };

    let mut seen: FxHashSet<Vec<NodeId>> = FxHashSet::default();
    seen.insert(first.nodes.clone());
    let mut accepted = vec![first];
    let mut pending: Vec<RouteCandidate> = Vec::new();

    while accepted.len() < k {
        let newest = accepted[accepted.len() - 1].nodes.clone();

        for j in 0..newest.len().saturating_sub(1) {
            deadline.check()?;
            let spur = newest[j];
            let root = &newest[..=j];
            let excluded = ExclusionSet::for_root(graph, &accepted, root);

            let Some(spur_path) = search(graph, costs, &excluded, spur, to, deadline)? else {
                continue;
            };

            let mut nodes = root[..j].to_vec();
            nodes.extend_from_slice(&spur_path.nodes);
            if !is_loopless(&nodes) || seen.contains(&nodes) {
                continue;
            }
            let Some(route) = Route::from_nodes(graph, costs, nodes) else {
                debug_assert!(false, "spliced candidate is not a path");
                continue;
            };
            seen.insert(route.nodes.clone());
            pending.push(RouteCandidate { route, root_len: j + 1 });
        }

        let Some(best) = pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| rank(&a.route, &b.route))
            .map(|(i, _)| i)
        else {
            break;
        };
        let chosen = pending.swap_remove(best);
        log::trace!(
            "accepted alternative {} ({:.1} m, diverges after {} nodes)",
            accepted.len() + 1,
            chosen.route.distance_m,
            chosen.root_len,
        );
        accepted.push(chosen.route);
    }

    // The heuristic can accept an alternative after a longer one.
    accepted[1..].sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

    log::debug!("k-shortest {from} -> {to}: {} of {k} routes", accepted.len());
    Ok(accepted)
}

/// Distance, then cost, then node sequence.
fn rank(a: &Route, b: &Route) -> Ordering {
    a.distance_m
        .total_cmp(&b.distance_m)
        .then_with(|| a.cost.total_cmp(&b.cost))
        .then_with(|| a.nodes.cmp(&b.nodes))
}
