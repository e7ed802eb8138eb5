//! Connectivity facts supplied by the road-network provider.
//!
//! Each fact names both endpoints as full [`Waypoint`] records, because a
//! continuation target produced by the provider is not necessarily one of
//! the uniformly sampled positions.  The builder interns both ends, so every
//! edge target resolves to a waypoint record.

use tr_core::Waypoint;

/// Which neighbouring lane a lateral link points to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

/// Lane classification reported for a lateral neighbour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneType {
    Driving,
    Shoulder,
    Parking,
    Sidewalk,
    Biking,
    Other,
}

/// Lateral adjacency metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneChange {
    pub side: Side,
    pub lane_type: LaneType,
    /// `true` when the neighbour lane carries traffic in the same direction.
    pub same_direction: bool,
}

impl LaneChange {
    /// Only same-direction driving lanes become lane-change edges.
    #[inline]
    pub fn is_drivable(&self) -> bool {
        self.lane_type == LaneType::Driving && self.same_direction
    }
}

/// The kind of connection a [`RoadLink`] describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkKind {
    /// Natural next sample along the direction of travel.
    Forward,
    /// Adjacent lane on the same road.
    Lateral(LaneChange),
    /// Entry → exit pair from the junction topology.
    Junction,
}

impl LinkKind {
    /// `true` if the builder inserts the reverse edge as well.
    #[inline]
    pub fn is_two_way(&self) -> bool {
        matches!(self, LinkKind::Forward | LinkKind::Lateral(_))
    }
}

/// One connectivity fact.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLink {
    pub from: Waypoint,
    pub to: Waypoint,
    pub kind: LinkKind,
}

impl RoadLink {
    pub fn forward(from: Waypoint, to: Waypoint) -> Self {
        Self { from, to, kind: LinkKind::Forward }
    }

    pub fn lateral(from: Waypoint, to: Waypoint, change: LaneChange) -> Self {
        Self { from, to, kind: LinkKind::Lateral(change) }
    }

    pub fn junction(entry: Waypoint, exit: Waypoint) -> Self {
        Self { from: entry, to: exit, kind: LinkKind::Junction }
    }
}
