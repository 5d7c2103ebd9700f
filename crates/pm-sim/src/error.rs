use pm_agent::AgentError;
use pm_core::{AgentId, TargetId};
use pm_swarm::SwarmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("target {0} not found")]
    TargetNotFound(TargetId),

    #[error("swarm error: {0}")]
    Swarm(#[from] SwarmError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
}

pub type WorldResult<T> = Result<T, WorldError>;
