//! World observer trait for progress reporting and data collection.

use pm_agent::{Mode, Roster};
use pm_core::{AgentId, TargetId, Tick};

/// Callbacks invoked by [`World::tick`][crate::World::tick].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: catch counter
///
/// ```rust,ignore
/// struct Catches(usize);
///
/// impl WorldObserver for Catches {
///     fn on_catch(&mut self, _tick: Tick, _catcher: AgentId, _target: TargetId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    fn on_mode_change(&mut self, _tick: Tick, _agent: AgentId, _from: Mode, _to: Mode) {}

    /// Called once per caught target, for the first member that reached it.
    fn on_catch(&mut self, _tick: Tick, _catcher: AgentId, _target: TargetId) {}

    fn on_mission_complete(&mut self, _tick: Tick, _agent: AgentId) {}

    fn on_camera_handoff(&mut self, _tick: Tick, _agent: AgentId) {}

    fn on_swarm_spawn(&mut self, _tick: Tick, _main: AgentId, _followers: &[AgentId]) {}

    fn on_swarm_despawn(&mut self, _tick: Tick, _main: AgentId, _followers: &[AgentId]) {}

    /// Called at the end of each tick with read-only access to every agent.
    fn on_tick_end(&mut self, _tick: Tick, _roster: &Roster) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
