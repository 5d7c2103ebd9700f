//! Agent-subsystem error type.

use thiserror::Error;

use pm_core::{AgentId, PmError};
use pm_patrol::PatrolError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {agent} lacks the {capability} capability")]
    MissingCapability {
        agent:      AgentId,
        capability: &'static str,
    },

    #[error("boundary error: {0}")]
    Patrol(#[from] PatrolError),

    #[error(transparent)]
    Core(#[from] PmError),
}

pub type AgentResult<T> = Result<T, AgentError>;
