//! Id-ordered agent storage.

use std::collections::BTreeMap;

use pm_core::AgentId;

use crate::{Agent, AgentBuilder};

/// All live agents, iterated in ascending [`AgentId`] order.
///
/// Ids are never reused, so a despawned follower's id cannot be confused
/// with a later spawn.
pub struct Roster {
    agents:  BTreeMap<AgentId, Agent>,
    next_id: AgentId,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self { agents: BTreeMap::new(), next_id: AgentId(0) }
    }

    /// Reserve the next id.
    pub fn allocate(&mut self) -> AgentId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Build and insert an agent under a fresh id.
    pub fn add(&mut self, builder: AgentBuilder) -> AgentId {
        let id = self.allocate();
        self.agents.insert(id, builder.build(id));
        id
    }

    /// Insert an agent built elsewhere (e.g. a follower).  Replaces any
    /// agent already stored under the same id.
    pub fn insert(&mut self, agent: Agent) {
        self.agents.insert(agent.id(), agent);
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Snapshot of the current ids, ascending.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }
}
