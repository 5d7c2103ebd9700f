//! Live positions of trackable targets.

use std::collections::BTreeMap;

use pm_core::{TargetId, Vec3};

#[derive(Clone, Debug, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<TargetId, Vec3>,
    next_id: u32,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target and return its freshly allocated id.
    pub fn spawn(&mut self, position: Vec3) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.insert(id, position);
        id
    }

    /// Move a target.  Returns `false` if it does not exist.
    pub fn update(&mut self, id: TargetId, position: Vec3) -> bool {
        match self.targets.get_mut(&id) {
            Some(p) => {
                *p = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: TargetId) -> Option<Vec3> {
        self.targets.remove(&id)
    }

    #[inline]
    pub fn position(&self, id: TargetId) -> Option<Vec3> {
        self.targets.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, Vec3)> + '_ {
        self.targets.iter().map(|(&id, &p)| (id, p))
    }
}
