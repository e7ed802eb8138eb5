//! Graph-subsystem error type.

use thiserror::Error;

use tr_core::{NodeId, TrError};

/// Errors produced by `tr-graph`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("edge length must be finite and >= 0, got {0}")]
    InvalidEdgeLength(f64),

    #[error(transparent)]
    Core(#[from] TrError),
}

pub type GraphResult<T> = Result<T, GraphError>;
