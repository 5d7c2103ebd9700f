//! Compound boundary polygon.
//!
//! The polygon is an ordered list of ground-plane vertices, implicitly closed
//! (the last vertex connects back to the first).  Self-intersecting outlines
//! are accepted but give even-odd results.

use pm_core::GroundPoint;

use crate::{PatrolError, PatrolResult};

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned ground-plane rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl BoundingBox {
    /// Shrink every side by `padding`.  A padding wider than the box
    /// produces an inverted box, which contains no grid samples.
    #[inline]
    pub fn inset(self, padding: f32) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x + padding,
            max_x: self.max_x - padding,
            min_z: self.min_z + padding,
            max_z: self.max_z - padding,
        }
    }

    #[inline]
    pub fn center(self) -> GroundPoint {
        GroundPoint::new((self.min_x + self.max_x) * 0.5, (self.min_z + self.max_z) * 0.5)
    }
}

// ── Boundary ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    vertices: Vec<GroundPoint>,
}

impl Boundary {
    /// Build a boundary from at least three finite vertices.
    pub fn new(vertices: Vec<GroundPoint>) -> PatrolResult<Self> {
        if vertices.len() < 3 {
            return Err(PatrolError::TooFewVertices(vertices.len()));
        }
        if let Some(index) = vertices.iter().position(|v| !(v.x.is_finite() && v.z.is_finite())) {
            return Err(PatrolError::NonFinite { index });
        }
        Ok(Self { vertices })
    }

    #[inline]
    pub fn vertices(&self) -> &[GroundPoint] {
        &self.vertices
    }

    /// `true` if `p` lies inside the polygon (even-odd rule).
    #[inline]
    pub fn contains(&self, p: GroundPoint) -> bool {
        point_in_polygon(p, &self.vertices)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_z: f32::INFINITY,
            max_z: f32::NEG_INFINITY,
        };
        for v in &self.vertices {
            bb.min_x = bb.min_x.min(v.x);
            bb.max_x = bb.max_x.max(v.x);
            bb.min_z = bb.min_z.min(v.z);
            bb.max_z = bb.max_z.max(v.z);
        }
        bb
    }

    /// Average of the vertices.
    pub fn centroid(&self) -> GroundPoint {
        let n = self.vertices.len() as f32;
        let (sx, sz) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sz), v| (sx + v.x, sz + v.z));
        GroundPoint::new(sx / n, sz / n)
    }

    /// Edges as `(start, end)` pairs, closing edge last.
    pub fn edges(&self) -> impl Iterator<Item = (GroundPoint, GroundPoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Even-odd ray cast along +x.
///
/// Edge `(i, j)` toggles the result when `p.z` falls in the half-open range
/// between its endpoints and `p.x` lies left of the crossing.  The half-open
/// test keeps a ray through a shared vertex from counting twice.
pub fn point_in_polygon(p: GroundPoint, vertices: &[GroundPoint]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        let spans = (vi.z <= p.z && p.z < vj.z) || (vj.z <= p.z && p.z < vi.z);
        if spans {
            let x_cross = (vj.x - vi.x) * (p.z - vi.z) / (vj.z - vi.z) + vi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
