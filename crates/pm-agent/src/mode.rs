//! Behavior modes and the observable agent state.

use std::fmt;

use pm_core::{Orientation, Vec3};

/// Exactly one mode is active at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Parked: before the mission starts, during take-off, after a halt or
    /// once the mission is complete.
    Idle,
    Patrol,
    Investigate,
    Intercept,
    Manual,
    Returning,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle        => "idle",
            Mode::Patrol      => "patrol",
            Mode::Investigate => "investigate",
            Mode::Intercept   => "intercept",
            Mode::Manual      => "manual",
            Mode::Returning   => "returning",
        };
        f.write_str(name)
    }
}

/// What to go back to after manual control or an investigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SavedState {
    pub mode:         Mode,
    pub patrol_index: usize,
}

/// Snapshot of an agent's behavior state.
///
/// `saved` is `Some` only while `mode` is [`Mode::Manual`] or
/// [`Mode::Investigate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentState {
    pub mode:         Mode,
    pub patrol_index: usize,
    pub position:     Vec3,
    pub orientation:  Orientation,
    pub saved:        Option<SavedState>,
}

impl AgentState {
    pub fn idle_at(position: Vec3) -> Self {
        Self {
            mode: Mode::Idle,
            patrol_index: 0,
            position,
            orientation: Orientation::default(),
            saved: None,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> SavedState {
        SavedState { mode: self.mode, patrol_index: self.patrol_index }
    }
}
