//! Edge cost model.
//!
//! ```text
//! cost(e) = alpha * length_m(e) + beta * expected_delay_secs(e)
//! ```
//!
//! The default (`alpha = 1`, `beta = 0`) is pure distance.  With `beta > 0`
//! the planner reads each edge's expected delay from a
//! [`DelaySource`]; segments never observed report the source's default
//! delay rather than zero, so untraveled roads do not look free.

use tr_core::EdgeId;
use tr_graph::WaypointGraph;
use tr_ledger::DelaySource;

use crate::{PlanError, PlanResult};

/// Weights of the distance/delay blend.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostModel {
    /// Weight per metre of edge length.
    pub alpha: f64,
    /// Weight per second of expected delay.
    pub beta: f64,
}

impl CostModel {
    /// `alpha = 1`, `beta = 0`.
    pub const DISTANCE: CostModel = CostModel { alpha: 1.0, beta: 0.0 };

    pub fn new(alpha: f64, beta: f64) -> PlanResult<Self> {
        let model = Self { alpha, beta };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> PlanResult<()> {
        for (name, w) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(PlanError::InvalidInput(format!("cost weight {name} must be finite and >= 0, got {w}")));
            }
        }
        Ok(())
    }

    /// `true` if the delay term contributes nothing.
    #[inline]
    pub fn is_distance_only(&self) -> bool {
        self.beta == 0.0
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::DISTANCE
    }
}

/// Per-edge search cost, evaluated once per query.
#[derive(Clone, Debug)]
pub struct EdgeCosts {
    costs: Vec<f64>,
}

impl EdgeCosts {
    /// Edge lengths as costs.
    pub fn distance_only(graph: &WaypointGraph) -> Self {
        Self { costs: graph.edge_length_m.clone() }
    }

    /// Evaluate `model` for every edge of `graph`.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidInput`] if the weights are invalid, or if the
    /// model needs delays and `delays` is `None`.
    pub fn compute(
        graph: &WaypointGraph,
        model: &CostModel,
        delays: Option<&dyn DelaySource>,
    ) -> PlanResult<Self> {
        model.validate()?;
        if model.is_distance_only() {
            let costs = graph.edge_length_m.iter().map(|&len| model.alpha * len).collect();
            return Ok(Self { costs });
        }
        let delays = delays.ok_or_else(|| {
            PlanError::InvalidInput("delay-aware cost model needs a delay source".to_owned())
        })?;

        let costs = (0..graph.edge_count())
            .map(|i| {
                let from = graph.key_of(graph.edge_from[i]);
                let to = graph.key_of(graph.edge_to[i]);
                // Clamp so a misbehaving source cannot produce negative weights.
                let delay = delays.expected_delay(&from, &to).max(0.0);
                model.alpha * graph.edge_length_m[i] + model.beta * delay
            })
            .collect();
        Ok(Self { costs })
    }

    #[inline]
    pub fn get(&self, edge: EdgeId) -> f64 {
        self.costs[edge.index()]
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
