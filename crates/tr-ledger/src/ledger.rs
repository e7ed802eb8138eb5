//! The shared, mutable delay ledger and its immutable snapshot.

use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;

use tr_core::NodeKey;

use crate::{DelaySource, LedgerError, LedgerResult};

/// Expected delay, in seconds, of a segment with no recorded traversals.
pub const DEFAULT_DELAY_SECS: f64 = 2.5;

/// A directed segment: `(from, to)`.
pub type SegmentKey = (NodeKey, NodeKey);

// ── SegmentStats ──────────────────────────────────────────────────────────────

/// Accumulated traversal statistics of one segment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SegmentStats {
    /// Sum of all observed traversal times, in seconds.
    pub cumulative_secs: f64,
    pub samples: u64,
}

impl SegmentStats {
    /// Mean traversal time, or `None` when nothing was observed.
    #[inline]
    pub fn average(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.cumulative_secs / self.samples as f64)
    }
}

// ── DrivingDelayLedger ────────────────────────────────────────────────────────

/// Thread-safe ledger of observed segment traversal times.
///
/// Only successful real traversals write to it; planning never does.  Sample
/// counts grow monotonically; nothing is ever removed.
pub struct DrivingDelayLedger {
    segments: RwLock<FxHashMap<SegmentKey, SegmentStats>>,
    default_delay_secs: f64,
}

impl DrivingDelayLedger {
    /// An empty ledger whose unseen segments report [`DEFAULT_DELAY_SECS`].
    pub fn new() -> Self {
        Self {
            segments: RwLock::new(FxHashMap::default()),
            default_delay_secs: DEFAULT_DELAY_SECS,
        }
    }

    /// An empty ledger whose unseen segments report `default_delay_secs`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidDefaultDelay`] for negative or non-finite values.
    pub fn with_default_delay(default_delay_secs: f64) -> LedgerResult<Self> {
        Self::from_segments(FxHashMap::default(), default_delay_secs)
    }

    pub(crate) fn from_segments(
        segments: FxHashMap<SegmentKey, SegmentStats>,
        default_delay_secs: f64,
    ) -> LedgerResult<Self> {
        if !(default_delay_secs.is_finite() && default_delay_secs >= 0.0) {
            return Err(LedgerError::InvalidDefaultDelay(default_delay_secs));
        }
        Ok(Self { segments: RwLock::new(segments), default_delay_secs })
    }

    pub fn default_delay_secs(&self) -> f64 {
        self.default_delay_secs
    }

    /// Append one observed traversal of `from → to`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidElapsed`] for negative or non-finite times; the
    /// ledger is left untouched.
    pub fn record_traversal(&self, from: NodeKey, to: NodeKey, elapsed_secs: f64) -> LedgerResult<()> {
        if !(elapsed_secs.is_finite() && elapsed_secs >= 0.0) {
            return Err(LedgerError::InvalidElapsed(elapsed_secs));
        }
        let mut segments = self.segments.write().unwrap_or_else(PoisonError::into_inner);
        let stats = segments.entry((from, to)).or_default();
        stats.cumulative_secs += elapsed_secs;
        stats.samples += 1;
        log::trace!("segment {from} -> {to}: {} samples", stats.samples);
        Ok(())
    }

    /// Record every segment of a driven route.
    ///
    /// `segment_secs[i]` is the time spent on `keys[i] → keys[i + 1]`.  All
    /// times are validated before any is recorded.
    pub fn record_route(&self, keys: &[NodeKey], segment_secs: &[f64]) -> LedgerResult<()> {
        if keys.len().saturating_sub(1) != segment_secs.len() {
            return Err(LedgerError::LengthMismatch { nodes: keys.len(), times: segment_secs.len() });
        }
        if let Some(&bad) = segment_secs.iter().find(|t| !(t.is_finite() && **t >= 0.0)) {
            return Err(LedgerError::InvalidElapsed(bad));
        }
        let mut segments = self.segments.write().unwrap_or_else(PoisonError::into_inner);
        for (pair, &secs) in keys.windows(2).zip(segment_secs) {
            let stats = segments.entry((pair[0], pair[1])).or_default();
            stats.cumulative_secs += secs;
            stats.samples += 1;
        }
        log::debug!("recorded {} segment traversals", segment_secs.len());
        Ok(())
    }

    /// Mean observed traversal time, or the default for unseen segments.
    pub fn average_delay(&self, from: &NodeKey, to: &NodeKey) -> f64 {
        self.stats(from, to)
            .and_then(|s| s.average())
            .unwrap_or(self.default_delay_secs)
    }

    pub fn stats(&self, from: &NodeKey, to: &NodeKey) -> Option<SegmentStats> {
        let segments = self.segments.read().unwrap_or_else(PoisonError::into_inner);
        segments.get(&(*from, *to)).copied()
    }

    /// Number of distinct segments with at least one record.
    pub fn segment_count(&self) -> usize {
        self.segments.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.segment_count() == 0
    }

    /// Point-in-time copy for lock-free reads during planning.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let segments = self.segments.read().unwrap_or_else(PoisonError::into_inner);
        LedgerSnapshot {
            segments: segments.clone(),
            default_delay_secs: self.default_delay_secs,
        }
    }
}

impl Default for DrivingDelayLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DelaySource for DrivingDelayLedger {
    fn expected_delay(&self, from: &NodeKey, to: &NodeKey) -> f64 {
        self.average_delay(from, to)
    }
}

// ── LedgerSnapshot ────────────────────────────────────────────────────────────

/// Immutable copy of a ledger's contents.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    segments: FxHashMap<SegmentKey, SegmentStats>,
    default_delay_secs: f64,
}

impl LedgerSnapshot {
    pub fn average_delay(&self, from: &NodeKey, to: &NodeKey) -> f64 {
        self.segments
            .get(&(*from, *to))
            .and_then(|s| s.average())
            .unwrap_or(self.default_delay_secs)
    }

    pub fn stats(&self, from: &NodeKey, to: &NodeKey) -> Option<SegmentStats> {
        self.segments.get(&(*from, *to)).copied()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in ascending key order.
    pub fn sorted_entries(&self) -> Vec<(SegmentKey, SegmentStats)> {
        let mut entries: Vec<_> = self.segments.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl DelaySource for LedgerSnapshot {
    fn expected_delay(&self, from: &NodeKey, to: &NodeKey) -> f64 {
        self.average_delay(from, to)
    }
}
