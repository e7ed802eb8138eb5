//! Planar coordinates in the simulator's world frame.
//!
//! Road samples arrive in metres on a flat local frame, so distances are
//! plain Euclidean.  `f64` is used throughout: node identity is derived from
//! these coordinates and must not lose sub-centimetre information before
//! quantization.

use std::fmt;

/// A point on the road plane, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance_m(self, other: Position) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared Euclidean distance; cheaper for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Smallest absolute difference between two headings, in degrees `[0, 180]`.
///
/// Headings are yaw angles in any winding (e.g. `-170` and `190` are the same
/// direction).
pub fn heading_delta_deg(a: f64, b: f64) -> f64 {
    let d = (b - a).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}
