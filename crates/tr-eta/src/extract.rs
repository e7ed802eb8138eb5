//! Route → [`FeatureVector`].
//!
//! Per-hop rules, for each consecutive waypoint pair `(a, b)` of the route:
//!
//! - distance is the straight-line distance `a → b`;
//! - a hop is a turn when the heading changes by more than
//!   [`TURN_THRESHOLD_DEG`];
//! - a hop counts as a junction when `a` lies in a junction;
//! - delay is the source's expected delay for `key(a) → key(b)`;
//! - speed is `a`'s speed limit, weighted by hop distance.
//!
//! Traffic lights are counted per route waypoint: a waypoint strictly
//! closer than [`TRAFFIC_LIGHT_RADIUS_M`] to any light counts once.

use tr_core::heading_delta_deg;
use tr_graph::WaypointGraph;
use tr_ledger::DelaySource;
use tr_route::Route;

use crate::{Environment, FeatureVector};

/// Heading change, in degrees, above which a hop is a turn.
pub const TURN_THRESHOLD_DEG: f64 = 30.0;

/// Distance, in metres, within which a waypoint is near a traffic light.
pub const TRAFFIC_LIGHT_RADIUS_M: f64 = 10.0;

/// Build the model input for `route`.
///
/// A single-node route has zero distance, turns, junctions, delay and
/// speed; the environment fields and traffic-light count still apply.
pub fn extract_features(
    route: &Route,
    graph: &WaypointGraph,
    delays: &dyn DelaySource,
    env: &Environment,
) -> FeatureVector {
    let mut total_distance_m = 0.0;
    let mut turn_count = 0u32;
    let mut junction_count = 0u32;
    let mut total_delay = 0.0;
    let mut weighted_speed = 0.0;

    for pair in route.nodes.windows(2) {
        let (a, b) = (graph.waypoint_of(pair[0]), graph.waypoint_of(pair[1]));
        let hop_m = a.position.distance_m(b.position);
        total_distance_m += hop_m;

        if heading_delta_deg(a.heading_deg, b.heading_deg) > TURN_THRESHOLD_DEG {
            turn_count += 1;
        }
        if a.is_junction {
            junction_count += 1;
        }
        total_delay += delays.expected_delay(&graph.key_of(pair[0]), &graph.key_of(pair[1]));
        weighted_speed += a.speed_limit_kmh * hop_m;
    }

    let hops = route.hop_count();
    let avg_delay_secs = if hops > 0 { total_delay / hops as f64 } else { 0.0 };
    let avg_speed_kmh = if total_distance_m > 0.0 { weighted_speed / total_distance_m } else { 0.0 };

    let r2 = TRAFFIC_LIGHT_RADIUS_M * TRAFFIC_LIGHT_RADIUS_M;
    let traffic_light_count = route
        .nodes
        .iter()
        .map(|&n| graph.waypoint_of(n).position)
        .filter(|p| env.traffic_lights().iter().any(|light| p.distance_sq(*light) < r2))
        .count() as u32;

    FeatureVector {
        total_distance_m,
        turn_count,
        junction_count,
        avg_delay_secs,
        avg_speed_kmh,
        hour_of_day: env.hour_of_day(),
        weather: env.weather(),
        traffic_light_count,
    }
}
