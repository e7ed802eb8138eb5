//! Error types for tr-ledger.

use thiserror::Error;

/// Errors raised by ledger updates and persistence.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("elapsed time must be finite and >= 0, got {0}")]
    InvalidElapsed(f64),

    #[error("default delay must be finite and >= 0, got {0}")]
    InvalidDefaultDelay(f64),

    #[error("route of {nodes} nodes cannot take {times} segment times")]
    LengthMismatch { nodes: usize, times: usize },

    #[error("malformed ledger row at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, LedgerError>`.
pub type LedgerResult<T> = Result<T, LedgerError>;
