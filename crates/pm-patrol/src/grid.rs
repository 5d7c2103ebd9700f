//! Patrol-point generation.
//!
//! # Algorithm
//!
//! 1. Take the boundary's bounding box and inset it by `padding` per side.
//! 2. Lay a `resolution × resolution` grid over the inset box.  The outer loop
//!    walks x columns, the inner loop walks z rows, so the output order is
//!    fully determined by the inputs.
//! 3. Keep the samples inside the polygon, lifted to `height`.
//!
//! When nothing survives, a single point at the box center is returned so an
//! agent always has somewhere to go.
//!
//! Aerial agents additionally get points along the boundary edges, pulled
//! inward, plus their home anchor at patrol height (see [`plan_patrol`]).

use pm_core::{AgentConfig, GroundPoint, MAX_GRID_RESOLUTION, Vec3};
use tracing::{info, warn};

use crate::Boundary;

/// Two points closer than this are treated as the same waypoint.
const DUPLICATE_EPSILON: f32 = 1e-3;

/// Edge fractions, `0.1 + 0.15·k` for `k = 0..6`.
const EDGE_FRACTIONS: [f32; 6] = [0.1, 0.25, 0.4, 0.55, 0.7, 0.85];

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Grid samples inside `boundary`, falling back to the box center when the
/// grid is empty.
pub fn generate_patrol_points(
    boundary: &Boundary,
    resolution: u32,
    padding: f32,
    height: f32,
) -> Vec<Vec3> {
    let mut points = grid_samples(boundary, resolution, padding, height);
    if points.is_empty() {
        points.push(center_fallback(boundary, height));
    }
    info!(count = points.len(), resolution, "generated patrol points");
    points
}

/// Raw grid samples with no fallback.
///
/// `resolution` is clamped to [`MAX_GRID_RESOLUTION`].
pub fn grid_samples(boundary: &Boundary, resolution: u32, padding: f32, height: f32) -> Vec<Vec3> {
    let bb = boundary.bounding_box().inset(padding);
    let mut points = Vec::new();
    if bb.min_x > bb.max_x || bb.min_z > bb.max_z {
        return points;
    }
    if resolution > MAX_GRID_RESOLUTION {
        warn!(resolution, max = MAX_GRID_RESOLUTION, "grid resolution clamped");
    }
    let res = resolution.min(MAX_GRID_RESOLUTION) as usize;

    match res {
        0 => {}
        1 => {
            let c = bb.center();
            if boundary.contains(c) {
                points.push(c.at_height(height));
            }
        }
        _ => {
            let step_x = (bb.max_x - bb.min_x) / (res - 1) as f32;
            let step_z = (bb.max_z - bb.min_z) / (res - 1) as f32;
            for i in 0..res {
                for j in 0..res {
                    let p = GroundPoint::new(bb.min_x + i as f32 * step_x, bb.min_z + j as f32 * step_z);
                    if boundary.contains(p) {
                        points.push(p.at_height(height));
                    }
                }
            }
        }
    }
    points
}

fn center_fallback(boundary: &Boundary, height: f32) -> Vec3 {
    let c = boundary.bounding_box().center();
    warn!(x = c.x, z = c.z, "no grid samples inside boundary, using bounding-box center");
    c.at_height(height)
}

// ── Edge sampling ─────────────────────────────────────────────────────────────

/// Points along every edge, nudged `padding` toward the vertex centroid.
///
/// Points that end up outside the polygon or duplicate an earlier entry of
/// `existing` are skipped.  Accepted points are appended to `existing`.
pub fn append_edge_points(boundary: &Boundary, padding: f32, height: f32, existing: &mut Vec<Vec3>) {
    let centroid = boundary.centroid().at_height(height);
    for (a, b) in boundary.edges() {
        let (a, b) = (a.at_height(height), b.at_height(height));
        for t in EDGE_FRACTIONS {
            let on_edge = a.lerp(b, t);
            let inward = (centroid - on_edge).with_y(0.0).normalized();
            let p = on_edge + inward * padding;
            if boundary.contains(p.ground()) && !is_duplicate(existing, p) {
                existing.push(p);
            }
        }
    }
}

/// Append `home` lifted to `height` if it lies inside and is new.
pub fn append_home_anchor(boundary: &Boundary, home: Vec3, height: f32, existing: &mut Vec<Vec3>) {
    let p = home.with_y(height);
    if boundary.contains(p.ground()) && !is_duplicate(existing, p) {
        existing.push(p);
    }
}

fn is_duplicate(points: &[Vec3], p: Vec3) -> bool {
    points.iter().any(|q| q.distance(p) < DUPLICATE_EPSILON)
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// Full patrol plan for one agent.
///
/// Grid samples always; edge samples and the home anchor when
/// `cfg.edge_sampling` is set.  The center fallback applies only when the
/// combined set is empty.
pub fn plan_patrol(boundary: &Boundary, cfg: &AgentConfig) -> Vec<Vec3> {
    let mut points = grid_samples(boundary, cfg.grid_resolution, cfg.padding, cfg.height);
    let grid_count = points.len();

    if cfg.edge_sampling {
        append_edge_points(boundary, cfg.padding, cfg.height, &mut points);
        if let Some(home) = cfg.home {
            append_home_anchor(boundary, home, cfg.height, &mut points);
        }
    }

    if points.is_empty() {
        points.push(center_fallback(boundary, cfg.height));
    }
    info!(
        count = points.len(),
        grid = grid_count,
        extra = points.len().saturating_sub(grid_count),
        "planned patrol route"
    );
    points
}
