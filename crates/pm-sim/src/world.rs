//! The `World` struct and its tick loop.

use std::collections::BTreeMap;

use pm_agent::{
    Agent, AgentBuilder, AgentEvent, AgentOutcome, AgentState, ManualInput, Roster, TargetRegistry,
    TickContext,
};
use pm_command::{Command, CommandSender};
use pm_core::{AgentId, SimClock, TargetId, Tick, Vec3};
use pm_swarm::{SwarmChange, SwarmCoordinator};
use tracing::{debug, info};

use crate::{WorldError, WorldObserver, WorldResult};

/// Every agent, swarm and target in one scene.
///
/// `World` drives the five-phase tick:
///
/// 1. **Swarms**: each coordinator reacts to its main agent's alert flag,
///    spawning or despawning followers.
/// 2. **Targets**: targets bound to an agent take that agent's position.
/// 3. **Agents**: every agent ticks in ascending `AgentId` order against the
///    same target snapshot.
/// 4. **Apply**: outcomes are applied in the same order.  A catch stands the
///    catcher's swarm down, removes the target and despawns the agent bound
///    to it.
/// 5. **Clock**: the world clock advances by `dt`.
///
/// Create with [`World::new`] or [`WorldBuilder`][crate::WorldBuilder].
#[derive(Default)]
pub struct World {
    clock:    SimClock,
    roster:   Roster,
    swarms:   Vec<SwarmCoordinator>,
    targets:  TargetRegistry,
    /// Targets whose position follows an agent.
    bindings: BTreeMap<TargetId, AgentId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Population ────────────────────────────────────────────────────────

    pub fn add_agent(&mut self, builder: AgentBuilder) -> AgentId {
        self.roster.add(builder)
    }

    /// Add an agent and put a swarm coordinator in charge of its followers.
    pub fn add_swarm_leader(&mut self, builder: AgentBuilder) -> WorldResult<AgentId> {
        let id = self.roster.add(builder);
        match SwarmCoordinator::new(id, &mut self.roster) {
            Ok(swarm) => {
                self.swarms.push(swarm);
                Ok(id)
            }
            Err(e) => {
                self.roster.remove(id);
                Err(e.into())
            }
        }
    }

    /// Put a coordinator in charge of an agent already in the world.
    pub fn add_swarm(&mut self, main: AgentId) -> WorldResult<()> {
        if self.swarm(main).is_none() {
            self.swarms.push(SwarmCoordinator::new(main, &mut self.roster)?);
        }
        Ok(())
    }

    /// A free-standing target at a fixed position.
    pub fn spawn_target(&mut self, position: Vec3) -> TargetId {
        self.targets.spawn(position)
    }

    /// Make `agent` a target: a new [`TargetId`] that follows the agent's
    /// position every tick until it is caught or the agent leaves.
    pub fn bind_target(&mut self, agent: AgentId) -> WorldResult<TargetId> {
        if let Some(existing) = self.target_of(agent) {
            return Ok(existing);
        }
        let position = self.agent(agent)?.position();
        let target = self.targets.spawn(position);
        self.bindings.insert(target, agent);
        info!(%agent, %target, "agent bound as target");
        Ok(target)
    }

    /// The target bound to `agent`, if any.
    pub fn target_of(&self, agent: AgentId) -> Option<TargetId> {
        self.bindings.iter().find(|&(_, &a)| a == agent).map(|(&t, _)| t)
    }

    // ── Inputs ────────────────────────────────────────────────────────────

    /// Queue a command for `agent`'s next tick.
    pub fn submit_command(&self, agent: AgentId, command: Command) -> WorldResult<bool> {
        Ok(self.agent(agent)?.submit_command(command))
    }

    /// A sender feeding `agent`'s command queue, for a
    /// [`CommandChannel`](pm_command::CommandChannel) or another thread.
    pub fn command_sender(&self, agent: AgentId) -> WorldResult<CommandSender> {
        Ok(self.agent(agent)?.command_sender())
    }

    /// Apply one event to `agent` immediately.
    pub fn handle_event(&mut self, agent: AgentId, event: AgentEvent) -> WorldResult<bool> {
        let targets = &self.targets;
        let agent = self.roster.get_mut(agent).ok_or(WorldError::AgentNotFound(agent))?;
        Ok(agent.handle_event(event, targets))
    }

    /// Raise `agent`'s alert against `target`.
    pub fn raise_alert(&mut self, agent: AgentId, target: TargetId) -> WorldResult<()> {
        if !self.targets.contains(target) {
            return Err(WorldError::TargetNotFound(target));
        }
        self.handle_event(agent, AgentEvent::RaiseAlert { target })?;
        Ok(())
    }

    pub fn clear_alert(&mut self, agent: AgentId) -> WorldResult<()> {
        self.handle_event(agent, AgentEvent::ClearAlert)?;
        Ok(())
    }

    /// Point `agent`'s tracking at `target` without raising an alert.
    pub fn track_target(&mut self, agent: AgentId, target: TargetId) -> WorldResult<()> {
        if !self.targets.contains(target) {
            return Err(WorldError::TargetNotFound(target));
        }
        self.agent_mut(agent)?.track(Some(target));
        Ok(())
    }

    pub fn set_manual_input(&mut self, agent: AgentId, input: ManualInput) -> WorldResult<()> {
        self.agent_mut(agent)?.set_manual_input(input)?;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn state(&self, agent: AgentId) -> WorldResult<AgentState> {
        Ok(*self.agent(agent)?.state())
    }

    pub fn agent(&self, id: AgentId) -> WorldResult<&Agent> {
        self.roster.get(id).ok_or(WorldError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> WorldResult<&mut Agent> {
        self.roster.get_mut(id).ok_or(WorldError::AgentNotFound(id))
    }

    #[inline]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[inline]
    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The coordinator led by `main`, if any.
    pub fn swarm(&self, main: AgentId) -> Option<&SwarmCoordinator> {
        self.swarms.iter().find(|s| s.main() == main)
    }

    #[inline]
    pub fn swarms(&self) -> &[SwarmCoordinator] {
        &self.swarms
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the whole scene by one frame of `dt` seconds.
    pub fn tick<O: WorldObserver>(&mut self, dt: f32, observer: &mut O) {
        let now = self.clock.frame;
        observer.on_tick_start(now);

        // ── Phase 1: swarm alert edges ────────────────────────────────────
        for swarm in &mut self.swarms {
            match swarm.step(&mut self.roster) {
                Some(SwarmChange::Spawned(ids)) => observer.on_swarm_spawn(now, swarm.main(), &ids),
                Some(SwarmChange::Despawned(ids)) => observer.on_swarm_despawn(now, swarm.main(), &ids),
                None => {}
            }
        }

        // ── Phase 2: bound target positions ───────────────────────────────
        self.refresh_targets();

        // ── Phase 3: agents ───────────────────────────────────────────────
        let ctx = TickContext { dt, targets: &self.targets };
        let mut results: Vec<(AgentId, Vec<AgentOutcome>)> = Vec::new();
        for id in self.roster.ids() {
            if let Some(agent) = self.roster.get_mut(id) {
                let outcomes = agent.tick(&ctx);
                if !outcomes.is_empty() {
                    results.push((id, outcomes));
                }
            }
        }

        // ── Phase 4: apply outcomes in ascending id order ─────────────────
        for (id, outcomes) in results {
            for outcome in outcomes {
                match outcome {
                    AgentOutcome::ModeChanged { from, to } => observer.on_mode_change(now, id, from, to),
                    AgentOutcome::Caught(target) => self.apply_catch(now, id, target, observer),
                    AgentOutcome::MissionComplete => observer.on_mission_complete(now, id),
                    AgentOutcome::CameraHandoff => observer.on_camera_handoff(now, id),
                }
            }
        }

        observer.on_tick_end(now, &self.roster);
        self.clock.advance(dt);
    }

    /// Run exactly `n` ticks of `dt` seconds each.
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, dt: f32, observer: &mut O) {
        for _ in 0..n {
            self.tick(dt, observer);
        }
    }

    fn refresh_targets(&mut self) {
        let mut orphaned = Vec::new();
        for (&target, &agent) in &self.bindings {
            match self.roster.get(agent) {
                Some(a) => {
                    self.targets.update(target, a.position());
                }
                None => orphaned.push(target),
            }
        }
        for target in orphaned {
            self.bindings.remove(&target);
            self.targets.remove(target);
            info!(%target, "bound agent left, target removed");
        }
    }

    fn apply_catch<O: WorldObserver>(&mut self, now: Tick, catcher: AgentId, target: TargetId, observer: &mut O) {
        if !self.targets.contains(target) {
            // Another agent reached it earlier this tick.
            debug!(%catcher, %target, "target already caught");
            return;
        }
        observer.on_catch(now, catcher, target);

        match self.swarms.iter_mut().find(|s| s.is_member(catcher)) {
            Some(swarm) => swarm.cleanup_after_catch(&mut self.roster, &mut self.targets, target),
            None => {
                self.targets.remove(target);
            }
        }

        // Anyone else still alerted on this target stands down too.
        for id in self.roster.ids() {
            if let Some(agent) = self.roster.get_mut(id) {
                if agent.alert_active() && agent.target() == Some(target) {
                    agent.set_alert(false);
                }
            }
        }

        if let Some(bound) = self.bindings.remove(&target) {
            self.roster.remove(bound);
            info!(agent = %bound, %target, "caught agent removed");
        }
    }
}
