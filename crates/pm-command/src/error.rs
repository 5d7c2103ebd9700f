//! Command-subsystem error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("non-finite position {0}")]
    NonFinite(pm_core::Vec3),

    #[error("cannot resolve controller address {0:?}")]
    Address(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CommandResult<T> = Result<T, CommandError>;
