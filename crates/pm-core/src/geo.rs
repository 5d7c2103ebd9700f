//! World-space geometry for agents moving over a compound.
//!
//! The world is y-up.  Boundaries live on the ground plane as `(x, z)` pairs
//! ([`GroundPoint`]); agents carry a full [`Vec3`] position whose `y` is pinned
//! to a fixed height for ground profiles and free for aerial ones.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

// ── Vec3 ──────────────────────────────────────────────────────────────────────

/// A single-precision 3D vector / point.
///
/// Serializes as `{"x": .., "y": .., "z": ..}`, the shape used by the
/// command wire format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Distance between the ground projections of `self` and `other`.
    #[inline]
    pub fn ground_distance(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit vector in the same direction, or `ZERO` for a (near-)zero vector.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Copy of `self` with `y` replaced.
    #[inline]
    pub fn with_y(self, y: f32) -> Vec3 {
        Vec3 { y, ..self }
    }

    /// Step from `self` toward `target` by at most `max_delta`.
    ///
    /// Never overshoots: when `target` is within `max_delta` the result is
    /// exactly `target`.
    pub fn move_towards(self, target: Vec3, max_delta: f32) -> Vec3 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_delta || dist <= f32::EPSILON {
            return target;
        }
        self + delta * (max_delta / dist)
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, target: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        self + (target - self) * t
    }

    #[inline]
    pub fn ground(self) -> GroundPoint {
        GroundPoint { x: self.x, z: self.z }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// `true` when no component is NaN or infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── GroundPoint ───────────────────────────────────────────────────────────────

/// A boundary vertex on the ground plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundPoint {
    pub x: f32,
    pub z: f32,
}

impl GroundPoint {
    #[inline]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Lift onto the plane `y = height`.
    #[inline]
    pub fn at_height(self, height: f32) -> Vec3 {
        Vec3::new(self.x, height, self.z)
    }
}

// ── Orientation ───────────────────────────────────────────────────────────────

/// Yaw / pitch / roll in degrees.
///
/// Yaw 0 faces +z and grows clockwise seen from above (toward +x).  Positive
/// pitch looks down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Orientation {
    /// Orientation looking along `direction`, or `None` for a zero vector.
    pub fn facing(direction: Vec3) -> Option<Orientation> {
        let len = direction.length();
        if len <= f32::EPSILON {
            return None;
        }
        let yaw = direction.x.atan2(direction.z).to_degrees();
        let pitch = -(direction.y / len).clamp(-1.0, 1.0).asin().to_degrees();
        Some(Orientation { yaw, pitch, roll: 0.0 })
    }

    /// Same heading with pitch and roll removed.
    #[inline]
    pub fn level(self) -> Orientation {
        Orientation { yaw: self.yaw, pitch: 0.0, roll: 0.0 }
    }

    /// Horizontal forward vector for the current yaw.
    pub fn forward(self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Horizontal right-hand vector for the current yaw.
    pub fn right(self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, -yaw.sin())
    }

    /// Rotate about the vertical axis, keeping yaw in `[0, 360)`.
    pub fn rotate_yaw(&mut self, degrees: f32) {
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
    }
}
