//! Read-side seam between the ledger and the planner.

use tr_core::NodeKey;

/// Source of expected traversal delay for a directed segment.
///
/// Implementations return a default for segments never observed rather than
/// zero, so searches are not biased toward untraveled segments.
///
/// `Send + Sync` so one source can be shared by parallel planning queries.
pub trait DelaySource: Send + Sync {
    /// Expected traversal time of `from → to`, in seconds.
    fn expected_delay(&self, from: &NodeKey, to: &NodeKey) -> f64;
}
