//! Swarm-subsystem error type.

use thiserror::Error;

use pm_core::AgentId;

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("main agent {0} not found")]
    MainNotFound(AgentId),

    #[error("agent {0} cannot lead a swarm")]
    NotSwarmCapable(AgentId),
}

pub type SwarmResult<T> = Result<T, SwarmError>;
