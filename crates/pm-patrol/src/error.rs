//! Patrol-subsystem error type.

use thiserror::Error;

/// Errors produced by `pm-patrol`.
#[derive(Debug, Error)]
pub enum PatrolError {
    #[error("boundary needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("boundary vertex {index} is not finite")]
    NonFinite { index: usize },

    #[error("boundary parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PatrolResult<T> = Result<T, PatrolError>;
