//! Fluent builder for constructing a [`World`].

use pm_agent::AgentBuilder;
use tracing::info;

use crate::{World, WorldResult};

enum Slot {
    Agent,
    SwarmLeader,
    Target,
}

/// Fluent builder for [`World`].
///
/// Agents receive ids in the order they are added, starting at `AgentId(0)`.
///
/// | Method               | Adds                                               |
/// |----------------------|----------------------------------------------------|
/// | `.agent(b)`          | a plain agent                                      |
/// | `.swarm_leader(b)`   | an agent with a [`SwarmCoordinator`](pm_swarm::SwarmCoordinator) |
/// | `.target_agent(b)`   | an agent bound as a target ([`World::target_of`])  |
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new()
///     .agent(AgentBuilder::new(AgentProfile::drone(flight), drone_cfg))
///     .swarm_leader(AgentBuilder::new(AgentProfile::guard(), guard_cfg))
///     .target_agent(AgentBuilder::new(AgentProfile::patroller(), AgentConfig::patroller()))
///     .build()?;
/// world.run_ticks(600, 1.0 / 60.0, &mut NoopObserver);
/// ```
#[derive(Default)]
pub struct WorldBuilder {
    entries: Vec<(Slot, AgentBuilder)>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, builder: AgentBuilder) -> Self {
        self.entries.push((Slot::Agent, builder));
        self
    }

    pub fn swarm_leader(mut self, builder: AgentBuilder) -> Self {
        self.entries.push((Slot::SwarmLeader, builder));
        self
    }

    pub fn target_agent(mut self, builder: AgentBuilder) -> Self {
        self.entries.push((Slot::Target, builder));
        self
    }

    /// Validate every agent and return a ready-to-tick [`World`].
    pub fn build(self) -> WorldResult<World> {
        for (_, builder) in &self.entries {
            builder.validate()?;
        }

        let mut world = World::new();
        for (slot, builder) in self.entries {
            match slot {
                Slot::Agent => {
                    world.add_agent(builder);
                }
                Slot::SwarmLeader => {
                    world.add_swarm_leader(builder)?;
                }
                Slot::Target => {
                    let id = world.add_agent(builder);
                    world.bind_target(id)?;
                }
            }
        }
        info!(agents = world.roster().len(), swarms = world.swarms().len(), "world built");
        Ok(world)
    }
}
