//! Events accepted by [`Agent::handle_event`](crate::Agent::handle_event).
//!
//! # Transition table
//!
//! | From                               | Event           | To / effect                              |
//! |------------------------------------|-----------------|------------------------------------------|
//! | Idle (mission waiting)             | `StartMission`  | take-off, or Patrol from index 0         |
//! | Patrol, Returning                  | `Investigate`   | Investigate (tracked target required)    |
//! | Investigate                        | `ResumePatrol`  | Patrol at the nearest point              |
//! | Idle, Patrol, Returning, Investigate | `EnableManual` | Manual (`manual_control` required)      |
//! | Manual                             | `DisableManual`, `ResumePatrol` | restore the saved mode   |
//! | any                                | `RaiseAlert`    | alert flag set, target tracked           |
//! | any                                | `ClearAlert`    | alert flag cleared                       |
//! | any                                | `NavigateTo`    | waypoint appended to the route           |
//!
//! Every other pair is ignored, and once the mission is complete every
//! event is ignored.  Intercept is not event-driven: it is entered and left
//! on the tick from the alert flag and target liveness.

use pm_command::{Command, FlightMode};
use pm_core::{TargetId, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    StartMission,
    /// `position` is the reported sighting.  The orbit itself follows the
    /// tracked target's live position.
    Investigate { position: Option<Vec3> },
    ResumePatrol,
    EnableManual,
    DisableManual,
    RaiseAlert { target: TargetId },
    ClearAlert,
    NavigateTo { position: Vec3 },
}

impl From<Command> for AgentEvent {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::SetFlightMode { mode: FlightMode::Investigate, position } => {
                AgentEvent::Investigate { position }
            }
            Command::SetFlightMode { mode: FlightMode::Patrol, .. } => AgentEvent::ResumePatrol,
            Command::SetFlightMode { mode: FlightMode::Manual, .. } => AgentEvent::EnableManual,
            Command::NavigateTo { position } => AgentEvent::NavigateTo { position },
        }
    }
}

/// Outcomes reported by [`Agent::tick`](crate::Agent::tick) for the caller
/// to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentOutcome {
    ModeChanged { from: crate::Mode, to: crate::Mode },
    /// The agent reached the target with the intercept gate open.
    Caught(TargetId),
    MissionComplete,
    /// Post-landing delay elapsed; hand the view to the next camera.
    CameraHandoff,
}
