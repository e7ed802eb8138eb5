//! Planner error type.
//!
//! `Unreachable` and `NotFound` are ordinary outcomes of a query, not
//! faults; callers are expected to match on them and report.

use std::time::Duration;

use thiserror::Error;

use tr_core::{NodeId, Position};

/// Outcomes of a planning query other than a route.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("no route from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("no graph node near {0}")]
    NotFound(Position),

    #[error("invalid planning input: {0}")]
    InvalidInput(String),

    #[error("planning exceeded its {limit:?} budget")]
    Timeout { limit: Duration },
}

pub type PlanResult<T> = Result<T, PlanError>;
