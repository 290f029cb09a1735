//! Error types for graph construction and the quasi-threshold mover

use thiserror::Error;

/// Errors raised by the library.
///
/// The invalid-input variants are returned before any algorithm state is
/// built. `Internal` signals a broken tree invariant, which is a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QtmError {
    #[error("invalid input: duplicate vertex {0}")]
    DuplicateVertex(String),

    #[error("invalid input: edge references unknown vertex {0}")]
    UnknownVertex(String),

    #[error("invalid input: self-loop on vertex {0}")]
    SelfLoop(String),

    #[error("invalid input: parallel edge {0} - {1}")]
    ParallelEdge(String, String),

    #[error("invalid input: root id {0} collides with a graph vertex")]
    RootCollision(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("internal consistency error: {0}")]
    Internal(String),
}

impl QtmError {
    /// True for errors caused by the caller's graph or configuration.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, QtmError::Internal(_))
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        QtmError::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QtmError>;
