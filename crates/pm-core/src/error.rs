//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `PmError` as one
//! variant where configuration problems can surface.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `pm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PmError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `pm-*` crates.
pub type PmResult<T> = Result<T, PmError>;
