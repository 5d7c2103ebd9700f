//! Agent profiles.
//!
//! Drones, guards and the roaming target share one [`Agent`](crate::Agent)
//! implementation.  What differs is captured here: which behaviors the agent
//! may enter, what happens at the end of the patrol route, and whether it
//! flies.

use pm_core::FlightConfig;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// May chase an alerted target and declare a catch.
    pub intercept:      bool,
    /// Accepts operator control.
    pub manual_control: bool,
    /// Spawns a follower ring when its alert is raised.
    pub swarm_spawn:    bool,
}

/// Behavior once the last patrol point is reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatrolEnd {
    /// Head home, then complete the mission on arrival.
    Return,
    /// Complete the mission where it stands.
    Complete,
    /// Stop and wait in `Idle`.
    Halt,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentProfile {
    pub capabilities: Capabilities,
    pub patrol_end:   PatrolEnd,
    /// Take-off / landing profile.  `None` pins the agent to its patrol height.
    pub flight:       Option<FlightConfig>,
}

impl AgentProfile {
    /// Surveillance drone: manual control, lands on its pad after patrolling.
    pub fn drone(flight: FlightConfig) -> Self {
        Self {
            capabilities: Capabilities { manual_control: true, ..Capabilities::default() },
            patrol_end:   PatrolEnd::Return,
            flight:       Some(flight),
        }
    }

    /// Main guard: intercepts and leads a swarm.
    pub fn guard() -> Self {
        Self {
            capabilities: Capabilities { intercept: true, swarm_spawn: true, ..Capabilities::default() },
            patrol_end:   PatrolEnd::Return,
            flight:       None,
        }
    }

    /// Follower spawned by a main guard.
    pub fn follower(patrol_end: PatrolEnd) -> Self {
        Self {
            capabilities: Capabilities { intercept: true, ..Capabilities::default() },
            patrol_end,
            flight: None,
        }
    }

    /// Roaming ground patroller with no special behaviors.
    pub fn patroller() -> Self {
        Self {
            capabilities: Capabilities::default(),
            patrol_end:   PatrolEnd::Complete,
            flight:       None,
        }
    }

    #[inline]
    pub fn is_aerial(&self) -> bool {
        self.flight.is_some()
    }
}
