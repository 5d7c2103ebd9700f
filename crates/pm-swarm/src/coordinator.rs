//! Swarm coordinator for one main agent.

use pm_agent::{InterceptGate, Roster, TargetRegistry};
use pm_core::{AgentId, SwarmConfig, TargetId, Vec3};
use tracing::{info, warn};

use crate::{SwarmError, SwarmResult};

/// What a [`SwarmCoordinator::step`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwarmChange {
    Spawned(Vec<AgentId>),
    Despawned(Vec<AgentId>),
}

/// Evenly spaced ground offsets: `radius · (cos θᵢ, 0, sin θᵢ)` with
/// `θᵢ = i · 360° / count`.
pub fn ring_offsets(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let theta = (i as f32 * 360.0 / count as f32).to_radians();
            Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin())
        })
        .collect()
}

/// Owns the interception gate and the follower list for one main agent.
///
/// Members only read the gate through their
/// [`GateHandle`](pm_agent::GateHandle)s; the coordinator is its only writer.
pub struct SwarmCoordinator {
    main:      AgentId,
    config:    SwarmConfig,
    gate:      InterceptGate,
    offsets:   Vec<Vec3>,
    followers: Vec<AgentId>,
    spawned:   bool,
}

impl SwarmCoordinator {
    /// Attach a coordinator to `main`, handing it a gate handle.
    pub fn new(main: AgentId, roster: &mut Roster) -> SwarmResult<Self> {
        let agent = roster.get_mut(main).ok_or(SwarmError::MainNotFound(main))?;
        if !agent.profile().capabilities.swarm_spawn {
            return Err(SwarmError::NotSwarmCapable(main));
        }
        let config = agent.config().swarm.clone();
        let gate = InterceptGate::new();
        agent.attach_gate(gate.handle());

        Ok(Self {
            main,
            offsets: ring_offsets(config.followers, config.spawn_radius),
            config,
            gate,
            followers: Vec::new(),
            spawned: false,
        })
    }

    #[inline]
    pub fn main(&self) -> AgentId {
        self.main
    }

    #[inline]
    pub fn followers(&self) -> &[AgentId] {
        &self.followers
    }

    #[inline]
    pub fn gate_open(&self) -> bool {
        self.gate.is_open()
    }

    #[inline]
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// `true` for the main agent and every live follower.
    pub fn is_member(&self, id: AgentId) -> bool {
        id == self.main || self.followers.contains(&id)
    }

    /// React to the main agent's alert flag.
    ///
    /// Spawns once per raised alert and despawns once it clears.  A main
    /// agent that has left the roster takes its followers with it.
    pub fn step(&mut self, roster: &mut Roster) -> Option<SwarmChange> {
        let alert = roster.get(self.main).map(|a| a.alert_active());
        match alert {
            Some(true) if !self.spawned => Some(self.spawn(roster)),
            Some(false) | None if self.spawned => Some(self.despawn(roster)),
            _ => None,
        }
    }

    fn spawn(&mut self, roster: &mut Roster) -> SwarmChange {
        let mut spawned = Vec::with_capacity(self.offsets.len());
        for &offset in &self.offsets {
            let id = roster.allocate();
            let Some(main) = roster.get(self.main) else {
                break;
            };
            let follower = main.spawn_follower(id, offset, self.gate.handle());
            roster.insert(follower);
            spawned.push(id);
        }

        self.followers = spawned.clone();
        self.spawned = true;
        self.gate.open();
        info!(main = %self.main, followers = spawned.len(), "swarm spawned, intercept gate open");
        SwarmChange::Spawned(spawned)
    }

    fn despawn(&mut self, roster: &mut Roster) -> SwarmChange {
        let removed: Vec<AgentId> = self.followers.drain(..).filter(|&id| roster.remove(id).is_some()).collect();
        self.gate.close();
        self.spawned = false;
        info!(main = %self.main, followers = removed.len(), "swarm despawned, intercept gate closed");
        SwarmChange::Despawned(removed)
    }

    /// Stand the swarm down after any member caught `target`.
    ///
    /// The followers themselves are removed on the next [`step`](Self::step),
    /// once the cleared alert is observed.
    pub fn cleanup_after_catch(&mut self, roster: &mut Roster, targets: &mut TargetRegistry, target: TargetId) {
        if targets.remove(target).is_none() {
            warn!(main = %self.main, %target, "caught target was already gone");
        }
        if let Some(main) = roster.get_mut(self.main) {
            main.set_alert(false);
        }
        self.gate.close();
        for &id in &self.followers {
            if let Some(f) = roster.get_mut(id) {
                f.set_alert(false);
            }
        }
        info!(main = %self.main, %target, "target caught, swarm standing down");
    }
}
