//! Optional wall-clock budget for one planning query.

use std::time::{Duration, Instant};

use crate::{PlanError, PlanResult};

/// A query's time budget, started when the query begins.
#[derive(Copy, Clone, Debug)]
pub struct Deadline {
    limit: Option<(Instant, Duration)>,
}

impl Deadline {
    /// No budget: `check` always succeeds.
    pub fn none() -> Self {
        Self { limit: None }
    }

    /// Budget of `limit` starting now.
    pub fn after(limit: Duration) -> Self {
        Self { limit: Some((Instant::now(), limit)) }
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::none, Self::after)
    }

    /// # Errors
    ///
    /// [`PlanError::Timeout`] once the budget is spent.
    #[inline]
    pub fn check(&self) -> PlanResult<()> {
        match self.limit {
            Some((start, limit)) if start.elapsed() >= limit => Err(PlanError::Timeout { limit }),
            _ => Ok(()),
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
