//! Mission lifecycle.
//!
//! ```text
//! Waiting ──start delay / StartMission──▶ Departing ──airborne──▶ Underway ──▶ Complete
//!    └──────────────(ground profiles)──────────────────▶ Underway
//! ```
//!
//! All delays are [`Deadline`]s on the owning agent's [`SimClock`].
//! `Complete` is terminal.

use pm_core::{Deadline, SimClock};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissionPhase {
    /// Spawned, waiting for the start delay.
    Waiting,
    /// Taking off toward cruise altitude.
    Departing,
    Underway,
    Complete,
}

#[derive(Clone, Debug)]
pub struct Mission {
    phase:               MissionPhase,
    start_at:            Deadline,
    start_delay_elapsed: bool,
    handoff_at:          Option<Deadline>,
}

impl Mission {
    /// A mission that starts `start_delay_secs` after `clock`'s present.
    pub fn new(clock: &SimClock, start_delay_secs: f32) -> Self {
        Self {
            phase:               MissionPhase::Waiting,
            start_at:            clock.deadline_in(start_delay_secs),
            start_delay_elapsed: false,
            handoff_at:          None,
        }
    }

    /// A mission that is already running.  Used for spawned followers.
    pub fn already_underway() -> Self {
        Self {
            phase:               MissionPhase::Underway,
            start_at:            Deadline(0.0),
            start_delay_elapsed: true,
            handoff_at:          None,
        }
    }

    #[inline]
    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    #[inline]
    pub fn started(&self) -> bool {
        self.phase != MissionPhase::Waiting
    }

    #[inline]
    pub fn start_delay_elapsed(&self) -> bool {
        self.start_delay_elapsed
    }

    #[inline]
    pub fn complete(&self) -> bool {
        self.phase == MissionPhase::Complete
    }

    /// `true` once, on the first poll at or after the start deadline.
    pub(crate) fn poll_start(&mut self, clock: &SimClock) -> bool {
        if self.phase != MissionPhase::Waiting || self.start_delay_elapsed {
            return false;
        }
        if self.start_at.is_due(clock) {
            self.start_delay_elapsed = true;
            return true;
        }
        false
    }

    pub(crate) fn depart(&mut self) {
        if self.phase == MissionPhase::Waiting {
            self.phase = MissionPhase::Departing;
        }
    }

    pub(crate) fn underway(&mut self) {
        if matches!(self.phase, MissionPhase::Waiting | MissionPhase::Departing) {
            self.phase = MissionPhase::Underway;
        }
    }

    /// Mark complete and optionally schedule the camera handoff.
    pub(crate) fn finish(&mut self, clock: &SimClock, handoff_delay_secs: Option<f32>) {
        if self.phase == MissionPhase::Complete {
            return;
        }
        self.phase = MissionPhase::Complete;
        self.handoff_at = handoff_delay_secs.map(|d| clock.deadline_in(d));
    }

    /// `true` once, when the pending camera handoff falls due.
    pub(crate) fn poll_handoff(&mut self, clock: &SimClock) -> bool {
        match self.handoff_at {
            Some(d) if d.is_due(clock) => {
                self.handoff_at = None;
                true
            }
            _ => false,
        }
    }
}
