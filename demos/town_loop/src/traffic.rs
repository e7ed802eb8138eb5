//! Simulated driving times.
//!
//! Stands in for the simulator's vehicle: each road gets a fixed slowdown
//! factor for the run, and the avenue is congested.  A hop that leaves a
//! junction waypoint onto a different road waits at the intersection.

use rand::Rng;

use tr_graph::WaypointGraph;
use tr_route::Route;

use crate::network::Town;

/// Wait when crossing an intersection, in seconds.
const INTERSECTION_WAIT_SECS: f64 = 3.0;

pub struct Traffic {
    road_factor: Vec<f64>,
}

impl Traffic {
    pub fn new<R: Rng>(town: &Town, avenue_congestion: f64, rng: &mut R) -> Self {
        let mut road_factor: Vec<f64> = (0..town.road_count).map(|_| rng.gen_range(1.0..1.3)).collect();
        for &road in &town.avenue_roads {
            road_factor[road as usize] = avenue_congestion;
        }
        Self { road_factor }
    }

    /// Noise-free travel time of every hop of `route`.
    pub fn expected_hops(&self, graph: &WaypointGraph, route: &Route) -> Vec<f64> {
        route
            .nodes
            .windows(2)
            .map(|pair| {
                let (a, b) = (graph.waypoint_of(pair[0]), graph.waypoint_of(pair[1]));
                let factor = a.road_id.map_or(1.0, |r| self.road_factor[r as usize]);
                let mut secs = a.position.distance_m(b.position) / a.speed_limit_mps() * factor;
                if a.is_junction && a.road_id != b.road_id {
                    secs += INTERSECTION_WAIT_SECS;
                }
                secs
            })
            .collect()
    }

    pub fn expected(&self, graph: &WaypointGraph, route: &Route) -> f64 {
        self.expected_hops(graph, route).iter().sum()
    }

    /// One actual drive of `route`: expected hop times with ±10 % noise.
    pub fn drive<R: Rng>(&self, graph: &WaypointGraph, route: &Route, rng: &mut R) -> Vec<f64> {
        self.expected_hops(graph, route)
            .into_iter()
            .map(|secs| secs * rng.gen_range(0.9..1.1))
            .collect()
    }
}
