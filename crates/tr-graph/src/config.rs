//! Graph construction parameters.

use tr_core::{KeyResolution, TrError};

use crate::GraphResult;

/// Parameters of one graph build.
///
/// There is deliberately no `Default`: the sampling spacing trades routing
/// fidelity against node count and must be chosen by the caller.  Halving it
/// roughly doubles the node and edge counts and the cost of every search.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Distance in metres between consecutive road samples requested from the
    /// road-network provider.
    pub sample_spacing_m: f64,
    /// Grid step used to derive node identity from sample coordinates.
    #[cfg_attr(feature = "serde", serde(default))]
    pub key_resolution: KeyResolution,
}

impl GraphConfig {
    /// # Errors
    ///
    /// `sample_spacing_m` must be finite and positive.
    pub fn new(sample_spacing_m: f64, key_resolution: KeyResolution) -> GraphResult<Self> {
        let config = Self { sample_spacing_m, key_resolution };
        config.validate()?;
        Ok(config)
    }

    /// Re-check a config that was deserialized or built field-by-field.
    pub fn validate(&self) -> GraphResult<()> {
        if !(self.sample_spacing_m.is_finite() && self.sample_spacing_m > 0.0) {
            return Err(TrError::Config(format!(
                "sample_spacing_m must be finite and > 0, got {}",
                self.sample_spacing_m
            ))
            .into());
        }
        Ok(())
    }
}
