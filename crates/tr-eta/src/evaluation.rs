//! Per-ride prediction quality, appended to a CSV log.
//!
//! ```text
//! ride_id,predicted_eta,actual_time,baseline_time,eta_error,delta_vs_baseline,best_possible_time,delta_vs_best,selected_route,baseline_route
//! 3,41.2,44.0,52.5,2.8,8.5,,,0 4 9 13,0 1 2 13
//! ```
//!
//! Routes are written as space-separated node indices.  The best-possible
//! columns are empty when the ride has no such reference.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::Path;

use csv::{Reader, Writer, WriterBuilder};
use serde::{Deserialize, Serialize};

use tr_route::Route;

use crate::EtaResult;

/// How one ride's predicted and actual times compare.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RideEvaluation {
    pub ride_id: u64,
    #[serde(rename = "predicted_eta")]
    pub predicted_eta_secs: f64,
    #[serde(rename = "actual_time")]
    pub actual_secs: f64,
    /// Actual time of the shortest-distance route.
    #[serde(rename = "baseline_time")]
    pub baseline_secs: f64,
    /// `|predicted - actual|`.
    #[serde(rename = "eta_error")]
    pub eta_error_secs: f64,
    /// `baseline - actual`; positive when the chosen route was faster.
    #[serde(rename = "delta_vs_baseline")]
    pub delta_vs_baseline_secs: f64,
    #[serde(rename = "best_possible_time")]
    pub best_possible_secs: Option<f64>,
    /// `actual - best_possible`.
    #[serde(rename = "delta_vs_best")]
    pub delta_vs_best_secs: Option<f64>,
    pub selected_route: String,
    pub baseline_route: String,
}

impl RideEvaluation {
    pub fn new(
        ride_id: u64,
        predicted_eta_secs: f64,
        actual_secs: f64,
        baseline_secs: f64,
        best_possible_secs: Option<f64>,
        selected: &Route,
        baseline: &Route,
    ) -> Self {
        Self {
            ride_id,
            predicted_eta_secs,
            actual_secs,
            baseline_secs,
            eta_error_secs: (predicted_eta_secs - actual_secs).abs(),
            delta_vs_baseline_secs: baseline_secs - actual_secs,
            best_possible_secs,
            delta_vs_best_secs: best_possible_secs.map(|best| actual_secs - best),
            selected_route: route_label(selected),
            baseline_route: route_label(baseline),
        }
    }
}

impl fmt::Display for RideEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ride {}: predicted {:.1} s, actual {:.1} s, baseline {:.1} s, error {:.1} s, saved {:.1} s",
            self.ride_id,
            self.predicted_eta_secs,
            self.actual_secs,
            self.baseline_secs,
            self.eta_error_secs,
            self.delta_vs_baseline_secs,
        )?;
        if let Some(delta) = self.delta_vs_best_secs {
            write!(f, ", {delta:.1} s off best")?;
        }
        Ok(())
    }
}

fn route_label(route: &Route) -> String {
    route.nodes.iter().map(|n| n.0.to_string()).collect::<Vec<_>>().join(" ")
}

// ── EvaluationLog ─────────────────────────────────────────────────────────────

/// Append-only CSV log of [`RideEvaluation`]s.
///
/// The header is written only when the file is new or empty, so a log can
/// be reopened across runs.
pub struct EvaluationLog {
    writer: Writer<File>,
    written: usize,
}

impl EvaluationLog {
    pub fn open(path: &Path) -> EtaResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_new = file.metadata()?.len() == 0;
        let writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
        log::debug!("opened evaluation log {} (new: {is_new})", path.display());
        Ok(Self { writer, written: 0 })
    }

    pub fn append(&mut self, ride: &RideEvaluation) -> EtaResult<()> {
        self.writer.serialize(ride)?;
        self.written += 1;
        Ok(())
    }

    /// Rows appended through this handle.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> EtaResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Every evaluation in the log at `path`, in file order.
    pub fn read_all(path: &Path) -> EtaResult<Vec<RideEvaluation>> {
        let mut reader = Reader::from_path(path)?;
        let rows = reader.deserialize().collect::<Result<Vec<RideEvaluation>, _>>()?;
        Ok(rows)
    }
}

impl Drop for EvaluationLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("failed to flush evaluation log: {e}");
        }
    }
}
