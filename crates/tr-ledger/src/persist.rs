//! CSV persistence for the ledger.
//!
//! One row per segment, written in ascending key order:
//!
//! ```text
//! from_qx,from_qy,from_road,from_lane,to_qx,to_qy,to_road,to_lane,cumulative_time,sample_count
//! 123,-45,7,-1,143,-45,7,-1,31.5,3
//! ```
//!
//! Grid cells are integers and times are written in shortest round-trip
//! form, so `save` followed by `load` reproduces every `(cumulative_time,
//! sample_count)` pair exactly.  Absent road/lane ids are empty fields.
//!
//! Keys are only meaningful under the key resolution that produced them;
//! a ledger must be reloaded with the same resolution it was recorded with.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use tr_core::NodeKey;

use crate::{DrivingDelayLedger, LedgerError, LedgerResult, SegmentKey, SegmentStats};

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    from_qx: i64,
    from_qy: i64,
    from_road: Option<u32>,
    from_lane: Option<i32>,
    to_qx: i64,
    to_qy: i64,
    to_road: Option<u32>,
    to_lane: Option<i32>,
    cumulative_time: f64,
    sample_count: u64,
}

impl LedgerRow {
    fn new(from: &NodeKey, to: &NodeKey, stats: &SegmentStats) -> Self {
        Self {
            from_qx: from.qx,
            from_qy: from.qy,
            from_road: from.road_id,
            from_lane: from.lane_id,
            to_qx: to.qx,
            to_qy: to.qy,
            to_road: to.road_id,
            to_lane: to.lane_id,
            cumulative_time: stats.cumulative_secs,
            sample_count: stats.samples,
        }
    }

    fn keys(&self) -> (NodeKey, NodeKey) {
        (
            NodeKey { qx: self.from_qx, qy: self.from_qy, road_id: self.from_road, lane_id: self.from_lane },
            NodeKey { qx: self.to_qx, qy: self.to_qy, road_id: self.to_road, lane_id: self.to_lane },
        )
    }

    fn validate(&self) -> Result<SegmentStats, String> {
        if !(self.cumulative_time.is_finite() && self.cumulative_time >= 0.0) {
            return Err(format!("cumulative_time {} is not a finite non-negative number", self.cumulative_time));
        }
        if self.sample_count == 0 {
            return Err("sample_count must be at least 1".to_owned());
        }
        Ok(SegmentStats { cumulative_secs: self.cumulative_time, samples: self.sample_count })
    }
}

fn write_rows(tmp: &Path, entries: &[(SegmentKey, SegmentStats)]) -> LedgerResult<()> {
    let mut w = csv::Writer::from_path(tmp)?;
    for ((from, to), stats) in entries {
        w.serialize(LedgerRow::new(from, to, stats))?;
    }
    w.flush()?;
    Ok(())
}

impl DrivingDelayLedger {
    /// Write the ledger to `path`, replacing any previous file.
    ///
    /// The rows go to a sibling temporary file first and are renamed into
    /// place, so a crash mid-write leaves the previous ledger intact.  A
    /// failed save removes the temporary file.
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        let entries = self.snapshot().sorted_entries();
        let tmp = path.with_extension("csv.tmp");
        let written = write_rows(&tmp, &entries).and_then(|()| fs::rename(&tmp, path).map_err(LedgerError::from));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        log::info!("saved {} ledger segments to {}", entries.len(), path.display());
        Ok(())
    }

    /// Read a ledger previously written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// [`LedgerError::Malformed`] for unparsable rows, negative or non-finite
    /// times, zero sample counts, or a segment listed twice.
    pub fn load(path: &Path, default_delay_secs: f64) -> LedgerResult<Self> {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut segments = FxHashMap::default();

        for (i, row) in rdr.deserialize::<LedgerRow>().enumerate() {
            // Line 1 is the header.
            let line = i as u64 + 2;
            let row = row.map_err(|e| LedgerError::Malformed { line, reason: e.to_string() })?;
            let stats = row.validate().map_err(|reason| LedgerError::Malformed { line, reason })?;
            let (from, to) = row.keys();
            if segments.insert((from, to), stats).is_some() {
                return Err(LedgerError::Malformed {
                    line,
                    reason: format!("duplicate segment {from} -> {to}"),
                });
            }
        }

        log::info!("loaded {} ledger segments from {}", segments.len(), path.display());
        Self::from_segments(segments, default_delay_secs)
    }

    /// Like [`load`](Self::load), but a missing file yields an empty ledger.
    pub fn load_or_default(path: &Path, default_delay_secs: f64) -> LedgerResult<Self> {
        if !path.exists() {
            log::info!("no ledger at {}, starting empty", path.display());
            return Self::with_default_delay(default_delay_secs);
        }
        Self::load(path, default_delay_secs)
    }
}
