//! `tr-ledger`: the driving-delay ledger.
//!
//! The ledger maps a directed segment `(from, to)` of [`NodeKey`]s to the
//! total time spent traversing it and the number of traversals observed.
//! Agents write to it after driving a segment; planners only read it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`ledger`]  | `DrivingDelayLedger`, `SegmentStats`, `LedgerSnapshot`      |
//! | [`delay`]   | `DelaySource` trait: read-side seam used by the planner    |
//! | [`persist`] | CSV `save` / `load` / `load_or_default`                     |
//! | [`error`]   | `LedgerError`, `LedgerResult<T>`                            |
//!
//! # Concurrency
//!
//! All segments sit behind one `RwLock`.  A write holds the lock for the
//! whole `(cumulative, count)` update, so concurrent agents finishing the
//! same segment never lose a sample.  Reads share the lock.
//!
//! [`NodeKey`]: tr_core::NodeKey

pub mod delay;
pub mod error;
pub mod ledger;
pub mod persist;

#[cfg(test)]
mod tests;

pub use delay::DelaySource;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{DEFAULT_DELAY_SECS, DrivingDelayLedger, LedgerSnapshot, SegmentKey, SegmentStats};
