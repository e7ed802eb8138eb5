//! Synthetic town: a square street grid sampled the way a driving
//! simulator's road API exposes it.
//!
//! Every street between two intersections is one road with two parallel
//! lanes.  Lanes are sampled every `spacing_m` metres; consecutive samples
//! are joined by forward links and side-by-side samples by lateral links.
//! Samples next to an intersection are flagged as junction waypoints and
//! joined to the end samples of every other street at that intersection.
//!
//! Row 1 is a 60 km/h avenue; its second lane is a parking lane on the
//! even blocks, so those lateral links are dropped by the graph builder.

use tr_core::{Position, Waypoint};
use tr_graph::{LaneChange, LaneType, RoadLink, Side};

/// Intersections per side minus one.
pub const BLOCKS: usize = 3;
/// Length of one block, in metres.
pub const BLOCK_M: f64 = 100.0;
const LANE_OFFSET_M: f64 = 1.75;

pub struct Town {
    pub samples: Vec<Waypoint>,
    pub links: Vec<RoadLink>,
    pub traffic_lights: Vec<Position>,
    /// Road ids on the avenue.
    pub avenue_roads: Vec<u32>,
    pub road_count: u32,
}

/// A street's lane-1 end samples, keyed by the intersection they touch.
struct StreetEnd {
    intersection: (usize, usize),
    waypoint: Waypoint,
}

pub fn build_town(spacing_m: f64) -> Town {
    let mut town = Town {
        samples: Vec::new(),
        links: Vec::new(),
        traffic_lights: Vec::new(),
        avenue_roads: Vec::new(),
        road_count: 0,
    };
    let mut ends: Vec<StreetEnd> = Vec::new();

    for j in 0..=BLOCKS {
        for i in 0..=BLOCKS {
            if (1..BLOCKS).contains(&i) && (1..BLOCKS).contains(&j) {
                town.traffic_lights.push(corner(i, j));
            }
            // Eastbound street from (i, j) and northbound street from (i, j).
            if i < BLOCKS {
                let avenue = j == 1;
                let speed = if avenue { 60.0 } else { 40.0 };
                let parking = avenue && i % 2 == 0;
                let road = add_street(&mut town, &mut ends, (i, j), (i + 1, j), spacing_m, parking, speed);
                if avenue {
                    town.avenue_roads.push(road);
                }
            }
            if j < BLOCKS {
                add_street(&mut town, &mut ends, (i, j), (i, j + 1), spacing_m, false, 40.0);
            }
        }
    }

    for a in &ends {
        for b in &ends {
            if a.intersection == b.intersection && a.waypoint.road_id != b.waypoint.road_id {
                town.links.push(RoadLink::junction(a.waypoint.clone(), b.waypoint.clone()));
            }
        }
    }
    town
}

fn corner(i: usize, j: usize) -> Position {
    Position::new(i as f64 * BLOCK_M, j as f64 * BLOCK_M)
}

fn add_street(
    town: &mut Town,
    ends: &mut Vec<StreetEnd>,
    from: (usize, usize),
    to: (usize, usize),
    spacing_m: f64,
    parking_lane: bool,
    speed_limit_kmh: f64,
) -> u32 {
    let road = town.road_count;
    town.road_count += 1;

    let (a, b) = (corner(from.0, from.1), corner(to.0, to.1));
    let (dx, dy) = ((b.x - a.x) / BLOCK_M, (b.y - a.y) / BLOCK_M);
    let heading_deg = dy.atan2(dx).to_degrees();
    // Left-hand normal.
    let (nx, ny) = (-dy, dx);

    let count = (BLOCK_M / spacing_m).floor().max(1.0) as usize;
    let step = BLOCK_M / count as f64;

    let mut lanes: [Vec<Waypoint>; 2] = [Vec::new(), Vec::new()];
    for (lane_idx, lane) in lanes.iter_mut().enumerate() {
        let offset = if lane_idx == 0 { -LANE_OFFSET_M } else { LANE_OFFSET_M };
        for s in 0..count {
            let t = step * (s as f64 + 0.5);
            let wp = Waypoint::at(a.x + dx * t + nx * offset, a.y + dy * t + ny * offset)
                .with_lane(road, lane_idx as i32 + 1)
                .with_heading(heading_deg)
                .with_speed_limit(speed_limit_kmh)
                .with_junction(s == 0 || s + 1 == count);
            lane.push(wp);
        }
    }

    for lane in &lanes {
        for pair in lane.windows(2) {
            town.links.push(RoadLink::forward(pair[0].clone(), pair[1].clone()));
        }
    }
    let change = LaneChange {
        side: Side::Left,
        lane_type: if parking_lane { LaneType::Parking } else { LaneType::Driving },
        same_direction: true,
    };
    for (l1, l2) in lanes[0].iter().zip(&lanes[1]) {
        town.links.push(RoadLink::lateral(l1.clone(), l2.clone(), change));
    }

    ends.push(StreetEnd { intersection: from, waypoint: lanes[0][0].clone() });
    ends.push(StreetEnd { intersection: to, waypoint: lanes[0][count - 1].clone() });

    town.samples.extend(lanes.into_iter().flatten());
    road
}
