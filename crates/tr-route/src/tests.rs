//! Unit tests for tr-route.
//!
//! Fixture graphs use explicit edge lengths so costs are exact integers.

#[cfg(test)]
mod helpers {
    use tr_core::{KeyResolution, NodeId, Waypoint};
    use tr_graph::{GraphBuilder, GraphConfig, WaypointGraph};

    pub fn config() -> GraphConfig {
        GraphConfig::new(2.0, KeyResolution::default()).unwrap()
    }

    /// ```text
    /// A →1→ B →1→ D        E (isolated)
    /// A →5→ C →1→ D
    /// ```
    pub fn diamond() -> (WaypointGraph, [NodeId; 5]) {
        let mut b = GraphBuilder::new(config());
        let a = b.add_sample(&Waypoint::at(0.0, 0.0)).unwrap();
        let bb = b.add_sample(&Waypoint::at(1.0, 0.0)).unwrap();
        let c = b.add_sample(&Waypoint::at(0.0, 5.0)).unwrap();
        let d = b.add_sample(&Waypoint::at(2.0, 0.0)).unwrap();
        let e = b.add_sample(&Waypoint::at(50.0, 50.0)).unwrap();
        b.add_directed_edge(a, bb, 1.0).unwrap();
        b.add_directed_edge(bb, d, 1.0).unwrap();
        b.add_directed_edge(a, c, 5.0).unwrap();
        b.add_directed_edge(c, d, 1.0).unwrap();
        (b.build(), [a, bb, c, d, e])
    }

    /// `n × n` grid; node `(r, c)` has id `r * n + c`.  Each neighbouring
    /// pair is joined both ways with different integer lengths.
    pub fn grid(n: u32) -> WaypointGraph {
        let mut b = GraphBuilder::new(config());
        for r in 0..n {
            for c in 0..n {
                b.add_sample(&Waypoint::at(c as f64 * 10.0, r as f64 * 10.0)).unwrap();
            }
        }
        let id = |r: u32, c: u32| NodeId(r * n + c);
        let len = |x: u32, y: u32| 1.0 + ((x * 7 + y * 3) % 5) as f64;
        for r in 0..n {
            for c in 0..n {
                if c + 1 < n {
                    b.add_directed_edge(id(r, c), id(r, c + 1), len(r, c)).unwrap();
                    b.add_directed_edge(id(r, c + 1), id(r, c), len(c, r + 1)).unwrap();
                }
                if r + 1 < n {
                    b.add_directed_edge(id(r, c), id(r + 1, c), len(r + 2, c)).unwrap();
                    b.add_directed_edge(id(r + 1, c), id(r, c), len(c + 3, r)).unwrap();
                }
            }
        }
        b.build()
    }

    /// Sparse pseudo-random digraph from a fixed LCG seed.
    pub fn sparse(nodes: u32, edges: u32, seed: u64) -> WaypointGraph {
        let mut b = GraphBuilder::new(config());
        for i in 0..nodes {
            b.add_sample(&Waypoint::at(i as f64, 0.0)).unwrap();
        }
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) as u32
        };
        for _ in 0..edges {
            let from = next() % nodes;
            let to = next() % nodes;
            let len = 1 + next() % 9;
            if from != to {
                b.add_directed_edge(NodeId(from), NodeId(to), len as f64).unwrap();
            }
        }
        b.build()
    }

    /// Minimum cost over all loopless paths, by exhaustive DFS.
    pub fn brute_force_min(g: &WaypointGraph, from: NodeId, to: NodeId) -> Option<f64> {
        fn dfs(g: &WaypointGraph, at: NodeId, to: NodeId, on_path: &mut Vec<bool>, acc: f64, best: &mut Option<f64>) {
            if at == to {
                *best = Some(best.map_or(acc, |b: f64| b.min(acc)));
                return;
            }
            for (next, len) in g.neighbors(at) {
                if !on_path[next.index()] {
                    on_path[next.index()] = true;
                    dfs(g, next, to, on_path, acc + len, best);
                    on_path[next.index()] = false;
                }
            }
        }
        let mut on_path = vec![false; g.node_count()];
        on_path[from.index()] = true;
        let mut best = None;
        dfs(g, from, to, &mut on_path, 0.0, &mut best);
        best
    }

    pub fn all_nodes(g: &WaypointGraph) -> Vec<NodeId> {
        (0..g.node_count() as u32).map(NodeId).collect()
    }
}

// ── Single shortest path ──────────────────────────────────────────────────────

#[cfg(test)]
mod shortest {
    use super::helpers::{all_nodes, brute_force_min, diamond, grid, sparse};
    use crate::{Deadline, EdgeCosts, PlanError, Planner, YenPlanner, dijkstra};

    #[test]
    fn same_node_is_trivial() {
        let (g, _) = diamond();
        for n in all_nodes(&g) {
            let r = YenPlanner::default().shortest_path(&g, None, n, n).unwrap();
            assert_eq!(r.nodes, vec![n]);
            assert_eq!(r.cost, 0.0);
            assert!(r.is_trivial());
        }
    }

    #[test]
    fn diamond_prefers_short_branch() {
        let (g, [a, b, _, d, _]) = diamond();
        let r = YenPlanner::default().shortest_path(&g, None, a, d).unwrap();
        assert_eq!(r.nodes, vec![a, b, d]);
        assert_eq!(r.cost, 2.0);
        assert_eq!(r.distance_m, 2.0);
    }

    #[test]
    fn isolated_node_is_unreachable() {
        let (g, [a, _, _, _, e]) = diamond();
        assert_eq!(
            YenPlanner::default().shortest_path(&g, None, a, e),
            Err(PlanError::Unreachable { from: a, to: e })
        );
    }

    #[test]
    fn dead_end_reports_unreachable() {
        // D has no outgoing edges; searching from it reports Unreachable.
        let (g, [a, _, _, d, _]) = diamond();
        assert!(matches!(
            YenPlanner::default().shortest_path(&g, None, d, a),
            Err(PlanError::Unreachable { .. })
        ));
    }

    #[test]
    fn unknown_node_is_invalid_input() {
        let (g, [a, ..]) = diamond();
        assert!(matches!(
            YenPlanner::default().shortest_path(&g, None, a, tr_core::NodeId(99)),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn search_rejects_foreign_nodes() {
        let (g, [a, ..]) = diamond();
        let costs = EdgeCosts::distance_only(&g);
        let stranger = tr_core::NodeId(99);
        for (from, to) in [(a, stranger), (stranger, a), (stranger, stranger)] {
            assert!(matches!(
                dijkstra::shortest_path(&g, &costs, from, to, &Deadline::none()),
                Err(PlanError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn matches_brute_force_on_grid() {
        let g = grid(3);
        let planner = YenPlanner::default();
        for s in all_nodes(&g) {
            for e in all_nodes(&g) {
                let expected = brute_force_min(&g, s, e).unwrap();
                let r = planner.shortest_path(&g, None, s, e).unwrap();
                assert_eq!(r.cost, expected, "{s} -> {e}");
                assert_eq!(g.route_distance(&r.nodes), Some(r.distance_m));
            }
        }
    }

    #[test]
    fn matches_brute_force_on_sparse_digraphs() {
        let planner = YenPlanner::default();
        for seed in 1..6 {
            let g = sparse(8, 18, seed);
            for s in all_nodes(&g) {
                for e in all_nodes(&g) {
                    match (brute_force_min(&g, s, e), planner.shortest_path(&g, None, s, e)) {
                        (Some(expected), Ok(r)) => {
                            assert_eq!(r.cost, expected, "seed {seed}: {s} -> {e}");
                            assert!(r.is_loopless());
                        }
                        (None, Err(PlanError::Unreachable { .. })) => {}
                        (b, p) => panic!("seed {seed}: {s} -> {e}: brute force {b:?}, planner {p:?}"),
                    }
                }
            }
        }
    }

    #[test]
    fn equal_cost_ties_are_reproducible() {
        let g = grid(4);
        let planner = YenPlanner::default();
        let first = planner.shortest_path(&g, None, tr_core::NodeId(0), tr_core::NodeId(15)).unwrap();
        for _ in 0..5 {
            let again = planner.shortest_path(&g, None, tr_core::NodeId(0), tr_core::NodeId(15)).unwrap();
            assert_eq!(again.nodes, first.nodes);
        }
    }
}

// ── K shortest routes ─────────────────────────────────────────────────────────

#[cfg(test)]
mod k_shortest {
    use std::collections::HashSet;

    use tr_core::NodeId;

    use super::helpers::{all_nodes, diamond, grid, sparse};
    use crate::{Deadline, EdgeCosts, ExclusionSet, PlanError, Planner, Route, YenPlanner, yen};

    fn check_properties(g: &tr_graph::WaypointGraph, routes: &[Route], shortest: &Route) {
        assert_eq!(routes[0].nodes, shortest.nodes);
        let mut distinct = HashSet::new();
        for r in routes {
            assert!(r.is_loopless(), "loop in {:?}", r.nodes);
            assert!(distinct.insert(r.nodes.clone()), "duplicate {:?}", r.nodes);
            assert_eq!(g.route_distance(&r.nodes), Some(r.distance_m));
            assert_eq!(r.origin(), shortest.origin());
            assert_eq!(r.destination(), shortest.destination());
        }
        for pair in routes.windows(2) {
            assert!(pair[0].distance_m <= pair[1].distance_m);
        }
    }

    #[test]
    fn diamond_two_routes() {
        let (g, [a, b, c, d, _]) = diamond();
        let routes = YenPlanner::default().k_shortest_routes(&g, None, a, d, 2).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].nodes, vec![a, b, d]);
        assert_eq!(routes[0].distance_m, 2.0);
        assert_eq!(routes[1].nodes, vec![a, c, d]);
        assert_eq!(routes[1].distance_m, 6.0);
    }

    #[test]
    fn fewer_routes_than_requested() {
        let (g, [a, _, _, d, _]) = diamond();
        let routes = YenPlanner::default().k_shortest_routes(&g, None, a, d, 10).unwrap();
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn unreachable_yields_empty() {
        let (g, [a, _, _, _, e]) = diamond();
        let routes = YenPlanner::default().k_shortest_routes(&g, None, a, e, 3).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn zero_k_is_rejected() {
        let (g, [a, _, _, d, _]) = diamond();
        assert!(matches!(
            YenPlanner::default().k_shortest_routes(&g, None, a, d, 0),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn foreign_endpoint_is_rejected() {
        let (g, [a, ..]) = diamond();
        let costs = EdgeCosts::distance_only(&g);
        assert!(matches!(
            yen::k_shortest_routes(&g, &costs, a, NodeId(99), 3, &Deadline::none()),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn same_node_has_one_route() {
        let (g, [a, ..]) = diamond();
        let routes = YenPlanner::default().k_shortest_routes(&g, None, a, a, 3).unwrap();
        assert_eq!(routes, vec![Route::trivial(a)]);
    }

    #[test]
    fn grid_alternatives_hold_invariants() {
        let g = grid(4);
        let planner = YenPlanner::default();
        for (s, e) in [(0, 15), (3, 12), (5, 10), (15, 0)] {
            let (s, e) = (NodeId(s), NodeId(e));
            let routes = planner.k_shortest_routes(&g, None, s, e, 6).unwrap();
            assert_eq!(routes.len(), 6, "a 4x4 grid has many loopless routes");
            check_properties(&g, &routes, &planner.shortest_path(&g, None, s, e).unwrap());
        }
    }

    #[test]
    fn sparse_alternatives_hold_invariants() {
        let planner = YenPlanner::default();
        for seed in 1..6 {
            let g = sparse(9, 24, seed);
            for s in all_nodes(&g) {
                for e in all_nodes(&g) {
                    let Ok(shortest) = planner.shortest_path(&g, None, s, e) else { continue };
                    let routes = planner.k_shortest_routes(&g, None, s, e, 4).unwrap();
                    assert!(!routes.is_empty() && routes.len() <= 4);
                    check_properties(&g, &routes, &shortest);
                }
            }
        }
    }

    #[test]
    fn shared_graph_is_not_mutated() {
        let g = grid(4);
        let (to, len) = (g.edge_to.clone(), g.edge_length_m.clone());
        let planner = YenPlanner::default();
        let expected = planner.k_shortest_routes(&g, None, NodeId(0), NodeId(15), 5).unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let got = planner.k_shortest_routes(&g, None, NodeId(0), NodeId(15), 5).unwrap();
                    assert_eq!(got, expected);
                });
            }
        });
        assert_eq!(g.edge_to, to);
        assert_eq!(g.edge_length_m, len);
    }

    #[test]
    fn exclusion_removes_only_next_hops_of_matching_roots() {
        let (g, [a, b, c, d, _]) = diamond();
        let known = vec![
            Route::from_nodes(&g, &crate::EdgeCosts::distance_only(&g), vec![a, b, d]).unwrap(),
        ];
        let at_a = ExclusionSet::for_root(&g, &known, &[a]);
        assert_eq!(at_a.len(), 1);
        assert!(at_a.contains(g.find_edge(a, b).unwrap()));
        assert!(!at_a.contains(g.find_edge(a, c).unwrap()));

        // A root the known route does not start with excludes nothing.
        assert!(ExclusionSet::for_root(&g, &known, &[c]).is_empty());
        // The full route has no next hop to exclude.
        assert!(ExclusionSet::for_root(&g, &known, &[a, b, d]).is_empty());
    }
}

// ── Delay-aware costs ─────────────────────────────────────────────────────────

#[cfg(test)]
mod delay_aware {
    use tr_core::{KeyResolution, NodeId, Waypoint};
    use tr_graph::{GraphBuilder, GraphConfig, WaypointGraph};
    use tr_ledger::DrivingDelayLedger;

    use super::helpers::diamond;
    use crate::{CostModel, EdgeCosts, PlanError, Planner, PlannerConfig, YenPlanner};

    fn delay_planner(beta: f64) -> YenPlanner {
        YenPlanner::new(PlannerConfig { cost: CostModel::new(1.0, beta).unwrap(), ..Default::default() }).unwrap()
    }

    /// Two equal-length branches: S → L → T and S → R → T, 10 m per hop.
    fn twin_branches() -> (WaypointGraph, [NodeId; 4]) {
        let config = GraphConfig::new(2.0, KeyResolution::default()).unwrap();
        let mut b = GraphBuilder::new(config);
        let s = b.add_sample(&Waypoint::at(0.0, 0.0)).unwrap();
        let l = b.add_sample(&Waypoint::at(5.0, 5.0)).unwrap();
        let r = b.add_sample(&Waypoint::at(5.0, -5.0)).unwrap();
        let t = b.add_sample(&Waypoint::at(10.0, 0.0)).unwrap();
        for (x, y) in [(s, l), (l, t), (s, r), (r, t)] {
            b.add_directed_edge(x, y, 10.0).unwrap();
        }
        (b.build(), [s, l, r, t])
    }

    #[test]
    fn observed_congestion_diverts_route() {
        let (g, [a, b, c, d, _]) = diamond();
        let ledger = DrivingDelayLedger::new();
        ledger.record_traversal(g.key_of(b), g.key_of(d), 100.0).unwrap();

        let pure = YenPlanner::default().shortest_path(&g, Some(&ledger), a, d).unwrap();
        assert_eq!(pure.nodes, vec![a, b, d]);

        let aware = delay_planner(1.0).shortest_path(&g, Some(&ledger), a, d).unwrap();
        assert_eq!(aware.nodes, vec![a, c, d]);
        // 6 m + 2 unseen hops at the 2.5 s default.
        assert_eq!(aware.cost, 11.0);
        assert_eq!(aware.distance_m, 6.0);
    }

    #[test]
    fn unseen_segments_are_not_free() {
        let (g, [s, l, r, t]) = twin_branches();
        let ledger = DrivingDelayLedger::new();
        // Left branch observed faster than the default; right never driven.
        ledger.record_traversal(g.key_of(s), g.key_of(l), 1.0).unwrap();
        ledger.record_traversal(g.key_of(l), g.key_of(t), 1.0).unwrap();

        let route = delay_planner(1.0).shortest_path(&g, Some(&ledger), s, t).unwrap();
        assert_eq!(route.nodes, vec![s, l, t]);
        assert_ne!(route.nodes, vec![s, r, t]);
    }

    #[test]
    fn snapshot_plans_like_ledger() {
        let (g, [a, _, _, d, _]) = diamond();
        let ledger = DrivingDelayLedger::new();
        ledger.record_traversal(g.key_of(a), g.key_of(tr_core::NodeId(1)), 40.0).unwrap();
        let snap = ledger.snapshot();
        let planner = delay_planner(0.5);
        assert_eq!(
            planner.k_shortest_routes(&g, Some(&ledger), a, d, 2).unwrap(),
            planner.k_shortest_routes(&g, Some(&snap), a, d, 2).unwrap()
        );
    }

    #[test]
    fn delay_model_needs_a_source() {
        let (g, [a, _, _, d, _]) = diamond();
        assert!(matches!(
            delay_planner(1.0).shortest_path(&g, None, a, d),
            Err(PlanError::InvalidInput(_))
        ));
        // Pure distance never consults the source.
        assert!(EdgeCosts::compute(&g, &CostModel::DISTANCE, None).is_ok());
    }

    #[test]
    fn cost_weights_are_validated() {
        assert!(CostModel::new(-1.0, 0.0).is_err());
        assert!(CostModel::new(1.0, f64::NAN).is_err());
        assert!(YenPlanner::new(PlannerConfig { k: 0, ..Default::default() }).is_err());
    }
}

// ── Deadlines, batches, snapping ──────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use std::time::Duration;

    use tr_core::{NodeId, Position};
    use tr_graph::GraphBuilder;

    use super::helpers::{config, diamond, grid};
    use crate::{
        Deadline, EdgeCosts, PlanError, PlanRequest, Planner, PlannerConfig, YenPlanner, plan_batch, yen,
    };

    #[test]
    fn zero_budget_times_out() {
        let g = grid(5);
        let costs = EdgeCosts::distance_only(&g);
        let deadline = Deadline::after(Duration::ZERO);
        assert!(matches!(
            yen::k_shortest_routes(&g, &costs, NodeId(0), NodeId(24), 3, &deadline),
            Err(PlanError::Timeout { .. })
        ));

        let planner = YenPlanner::new(PlannerConfig { timeout_ms: Some(0), ..Default::default() }).unwrap();
        assert!(matches!(
            planner.k_shortest_routes(&g, None, NodeId(0), NodeId(24), 3),
            Err(PlanError::Timeout { .. })
        ));
    }

    #[test]
    fn generous_budget_succeeds() {
        let g = grid(5);
        let planner = YenPlanner::new(PlannerConfig { timeout_ms: Some(60_000), ..Default::default() }).unwrap();
        assert_eq!(planner.k_shortest_routes(&g, None, NodeId(0), NodeId(24), 3).unwrap().len(), 3);
    }

    #[test]
    fn batch_keeps_request_order() {
        let (g, [a, b, c, d, e]) = diamond();
        let requests = [
            PlanRequest { from: a, to: d, k: 2 },
            PlanRequest { from: a, to: e, k: 2 },
            PlanRequest { from: c, to: d, k: 1 },
            PlanRequest { from: b, to: d, k: 0 },
        ];
        let results = plan_batch(&YenPlanner::default(), &g, None, &requests);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().len(), 2);
        assert!(results[1].as_ref().unwrap().is_empty());
        assert_eq!(results[2].as_ref().unwrap()[0].nodes, vec![c, d]);
        assert!(matches!(results[3], Err(PlanError::InvalidInput(_))));
    }

    #[test]
    fn positions_snap_to_nodes() {
        let (g, [a, b, _, d, _]) = diamond();
        let routes = YenPlanner::default()
            .k_routes_between(&g, None, Position::new(0.1, -0.1), Position::new(2.2, 0.1), 1)
            .unwrap();
        assert_eq!(routes[0].nodes, vec![a, b, d]);
    }

    #[test]
    fn empty_graph_reports_not_found() {
        let g = GraphBuilder::new(config()).build();
        let origin = Position::new(0.0, 0.0);
        assert_eq!(
            YenPlanner::default().k_routes_between(&g, None, origin, origin, 1),
            Err(PlanError::NotFound(origin))
        );
    }
}
