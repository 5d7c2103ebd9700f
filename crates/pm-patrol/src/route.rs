//! Ordered patrol route with nearest-point lookup.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over the route's points answers "which waypoint is
//! closest to me" when an agent resumes patrolling after manual control, an
//! intercept, or a lost investigation target.  Appending a waypoint inserts
//! into the tree, so the index always covers the full route.

use std::fmt;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use pm_core::Vec3;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct PointEntry {
    point: [f32; 3],
    index: usize,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PointEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── PatrolRoute ───────────────────────────────────────────────────────────────

/// Patrol waypoints in visiting order.
///
/// Followers receive a clone of their main agent's route, so later appends
/// on one route do not affect the other.
#[derive(Clone, Default)]
pub struct PatrolRoute {
    points: Vec<Vec3>,
    spatial_idx: RTree<PointEntry>,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>) -> Self {
        let entries: Vec<PointEntry> = points
            .iter()
            .enumerate()
            .map(|(index, p)| PointEntry { point: p.to_array(), index })
            .collect();
        Self { points, spatial_idx: RTree::bulk_load(entries) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Add a waypoint at the end of the route.
    pub fn append(&mut self, point: Vec3) {
        let index = self.points.len();
        self.points.push(point);
        self.spatial_idx.insert(PointEntry { point: point.to_array(), index });
    }

    /// Index of the waypoint closest to `position` (3D distance).
    ///
    /// Equidistant waypoints resolve to the lowest index.  `None` for an
    /// empty route or a non-finite `position`.
    pub fn nearest_index(&self, position: Vec3) -> Option<usize> {
        if !position.is_finite() {
            return None;
        }
        let mut iter = self
            .spatial_idx
            .nearest_neighbor_iter_with_distance_2(&position.to_array());
        let (first, best) = iter.next()?;
        let tied = iter
            .take_while(|(_, d2)| *d2 <= best)
            .map(|(e, _)| e.index);
        Some(tied.fold(first.index, usize::min))
    }
}

impl fmt::Debug for PatrolRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatrolRoute").field("points", &self.points).finish()
    }
}
