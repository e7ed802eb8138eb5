//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `TrError` as one variant
//! via `#[from]`, so validation failures raised here surface unchanged.

use thiserror::Error;

/// Validation errors for the primitive types in `tr-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrError {
    #[error("key resolution must be finite and > 0, got {0}")]
    InvalidResolution(f64),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tr-core`.
pub type TrResult<T> = Result<T, TrError>;
