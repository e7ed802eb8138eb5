//! The waypoint record: a sampled road position plus lane metadata.

use crate::Position;

/// A sampled point on the road network.
///
/// The same record serves as the raw input sample handed over by the
/// road-network provider and as the node payload stored in the built graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: Position,
    /// Yaw in degrees, in the simulator's convention.
    pub heading_deg: f64,
    /// Road segment identifier, when the provider exposes one.
    pub road_id: Option<u32>,
    /// Lane identifier; its sign encodes the direction of travel.
    pub lane_id: Option<i32>,
    pub is_junction: bool,
    pub speed_limit_kmh: f64,
}

impl Waypoint {
    /// A bare waypoint with no road/lane identity, heading 0, outside any
    /// junction, and a 50 km/h limit.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Position::new(x, y),
            heading_deg: 0.0,
            road_id: None,
            lane_id: None,
            is_junction: false,
            speed_limit_kmh: 50.0,
        }
    }

    pub fn with_lane(mut self, road_id: u32, lane_id: i32) -> Self {
        self.road_id = Some(road_id);
        self.lane_id = Some(lane_id);
        self
    }

    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = heading_deg;
        self
    }

    pub fn with_junction(mut self, is_junction: bool) -> Self {
        self.is_junction = is_junction;
        self
    }

    pub fn with_speed_limit(mut self, speed_limit_kmh: f64) -> Self {
        self.speed_limit_kmh = speed_limit_kmh;
        self
    }

    /// Speed limit in metres per second.
    #[inline]
    pub fn speed_limit_mps(&self) -> f64 {
        self.speed_limit_kmh / 3.6
    }
}
