//! Quantized node identity.
//!
//! # Quantization
//!
//! A coordinate `v` maps to the integer grid cell
//!
//! ```text
//! cell = round(v / resolution)      // half away from zero
//! ```
//!
//! so two samples of the same physical waypoint that differ only by
//! floating-point noise (well under half a resolution step) share a cell.
//! Values exactly on a half-step boundary always round outward (`0.5 → 1`,
//! `-0.5 → -1`), never toward even.
//!
//! The cell pair alone would merge adjacent lanes whose centrelines are
//! closer than the resolution, so the road and lane identifiers are part of
//! the key: samples on different lanes never collapse, however close.

use std::fmt;

use crate::{Position, TrError, TrResult, Waypoint};

/// Default grid step in metres (one decimal place of a metre).
pub const DEFAULT_KEY_RESOLUTION_M: f64 = 0.1;

/// Distance from a half step, in grid steps, still treated as on it.
pub const HALF_STEP_TOLERANCE: f64 = 1e-6;

// ── KeyResolution ─────────────────────────────────────────────────────────────

/// Grid step used to quantize coordinates into [`NodeKey`]s.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct KeyResolution(f64);

impl KeyResolution {
    /// # Errors
    ///
    /// [`TrError::InvalidResolution`] unless `metres` is finite and positive.
    pub fn new(metres: f64) -> TrResult<Self> {
        if metres.is_finite() && metres > 0.0 {
            Ok(Self(metres))
        } else {
            Err(TrError::InvalidResolution(metres))
        }
    }

    #[inline]
    pub fn metres(self) -> f64 {
        self.0
    }

    /// Quantize one coordinate.
    ///
    /// A quotient within [`HALF_STEP_TOLERANCE`] of a half step counts as
    /// exactly on it, so decimal boundaries such as `0.15 / 0.1` round
    /// outward even though their binary quotient lands just below `x.5`.
    #[inline]
    pub fn quantize(self, v: f64) -> i64 {
        let q = v / self.0;
        let whole = q.trunc();
        if ((q - whole).abs() - 0.5).abs() <= HALF_STEP_TOLERANCE {
            (whole + q.signum()) as i64
        } else {
            q.round() as i64
        }
    }

    /// Centre of grid cell `cell`.
    #[inline]
    pub fn dequantize(self, cell: i64) -> f64 {
        cell as f64 * self.0
    }

    /// Identity of a bare position with no lane information.
    pub fn key_at(self, pos: Position) -> NodeKey {
        NodeKey {
            qx: self.quantize(pos.x),
            qy: self.quantize(pos.y),
            road_id: None,
            lane_id: None,
        }
    }

    /// Identity of a waypoint: quantized position plus road and lane.
    pub fn key_for(self, wp: &Waypoint) -> NodeKey {
        NodeKey {
            road_id: wp.road_id,
            lane_id: wp.lane_id,
            ..self.key_at(wp.position)
        }
    }
}

impl Default for KeyResolution {
    fn default() -> Self {
        Self(DEFAULT_KEY_RESOLUTION_M)
    }
}

impl TryFrom<f64> for KeyResolution {
    type Error = TrError;
    fn try_from(metres: f64) -> TrResult<Self> {
        Self::new(metres)
    }
}

impl From<KeyResolution> for f64 {
    fn from(r: KeyResolution) -> f64 {
        r.0
    }
}

// ── NodeKey ───────────────────────────────────────────────────────────────────

/// Hashable, totally ordered identity of a sampled road position.
///
/// Keys are only comparable when produced with the same [`KeyResolution`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeKey {
    /// Grid cell along x.
    pub qx: i64,
    /// Grid cell along y.
    pub qy: i64,
    pub road_id: Option<u32>,
    pub lane_id: Option<i32>,
}

impl NodeKey {
    /// Centre of this key's grid cell under `res`.
    pub fn centre(&self, res: KeyResolution) -> Position {
        Position::new(res.dequantize(self.qx), res.dequantize(self.qy))
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.qx, self.qy)?;
        match (self.road_id, self.lane_id) {
            (Some(r), Some(l)) => write!(f, " road {r} lane {l}"),
            (Some(r), None) => write!(f, " road {r}"),
            (None, Some(l)) => write!(f, " lane {l}"),
            (None, None) => Ok(()),
        }
    }
}
