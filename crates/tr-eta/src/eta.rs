//! ETA estimator seam and route selection.

use crate::{EtaError, EtaResult, FeatureVector, WeatherCode};

/// Travel-time predictor over [`FeatureVector`]s.
///
/// A trained regression model implements this outside the workspace;
/// [`FreeFlowEstimator`] is the built-in baseline.
pub trait EtaEstimator: Send + Sync {
    /// Predicted travel time, in seconds.
    fn predict_eta(&self, features: &FeatureVector) -> f64;

    fn predict_batch(&self, features: &[FeatureVector]) -> Vec<f64> {
        features.iter().map(|f| self.predict_eta(f)).collect()
    }
}

// ── FreeFlowEstimator ─────────────────────────────────────────────────────────

/// Analytic baseline: drive at the average speed limit, then add fixed
/// penalties per turn, junction hop and traffic light.  Heavy rain scales
/// the whole estimate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FreeFlowEstimator {
    /// Used when the route reports no usable speed.
    pub fallback_speed_kmh: f64,
    pub turn_penalty_secs: f64,
    pub junction_penalty_secs: f64,
    pub light_penalty_secs: f64,
    pub rain_factor: f64,
}

impl FreeFlowEstimator {
    pub fn validate(&self) -> EtaResult<()> {
        if !(self.fallback_speed_kmh.is_finite() && self.fallback_speed_kmh > 0.0) {
            return Err(EtaError::InvalidInput(format!(
                "fallback speed must be > 0 km/h, got {}",
                self.fallback_speed_kmh
            )));
        }
        let penalties = [
            ("turn penalty", self.turn_penalty_secs),
            ("junction penalty", self.junction_penalty_secs),
            ("light penalty", self.light_penalty_secs),
            ("rain factor", self.rain_factor),
        ];
        for (name, v) in penalties {
            if !(v.is_finite() && v >= 0.0) {
                return Err(EtaError::InvalidInput(format!("{name} must be finite and >= 0, got {v}")));
            }
        }
        Ok(())
    }
}

impl Default for FreeFlowEstimator {
    fn default() -> Self {
        Self {
            fallback_speed_kmh: 30.0,
            turn_penalty_secs: 3.0,
            junction_penalty_secs: 2.0,
            light_penalty_secs: 4.0,
            rain_factor: 1.2,
        }
    }
}

impl EtaEstimator for FreeFlowEstimator {
    fn predict_eta(&self, f: &FeatureVector) -> f64 {
        let speed_kmh = if f.avg_speed_kmh > 0.0 { f.avg_speed_kmh } else { self.fallback_speed_kmh };
        let drive = f.total_distance_m / (speed_kmh / 3.6);
        let penalties = self.turn_penalty_secs * f64::from(f.turn_count)
            + self.junction_penalty_secs * f64::from(f.junction_count)
            + self.light_penalty_secs * f64::from(f.traffic_light_count);
        let eta = drive + penalties;
        if f.weather == WeatherCode::HeavyRain { eta * self.rain_factor } else { eta }
    }
}

// ── Route selection ───────────────────────────────────────────────────────────

/// Outcome of [`select_best_route`].
#[derive(Clone, Debug, PartialEq)]
pub struct RouteChoice {
    /// Index of the chosen candidate.
    pub index: usize,
    /// Predicted ETA of every candidate, in input order.
    pub etas: Vec<f64>,
}

impl RouteChoice {
    pub fn eta(&self) -> f64 {
        self.etas[self.index]
    }
}

/// Pick the candidate with the lowest predicted ETA.
///
/// Equal ETAs resolve to the earlier candidate, which is the shorter route
/// when the candidates come from `k_shortest_routes`.
///
/// # Errors
///
/// [`EtaError::NoCandidates`] if `candidates` is empty.
pub fn select_best_route<E: EtaEstimator + ?Sized>(
    estimator: &E,
    candidates: &[FeatureVector],
) -> EtaResult<RouteChoice> {
    let etas = estimator.predict_batch(candidates);
    let index = etas
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .ok_or(EtaError::NoCandidates)?;
    log::debug!("selected candidate {index} of {} (eta {:.1} s)", etas.len(), etas[index]);
    Ok(RouteChoice { index, etas })
}
