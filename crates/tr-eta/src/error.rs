//! Error types for tr-eta.

use thiserror::Error;

/// Errors raised while building model inputs or writing evaluations.
#[derive(Debug, Error)]
pub enum EtaError {
    #[error("hour of day must be in 0..=23, got {0}")]
    InvalidHour(u8),

    #[error("invalid estimator setting: {0}")]
    InvalidInput(String),

    #[error("no candidate routes to choose from")]
    NoCandidates,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, EtaError>`.
pub type EtaResult<T> = Result<T, EtaError>;
