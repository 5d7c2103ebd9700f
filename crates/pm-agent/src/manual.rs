//! Operator control.

use pm_core::{AgentConfig, Vec3};

use crate::AgentState;

/// Latest operator input.  Axes are clamped to `[-1, 1]` when applied.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ManualInput {
    pub forward:  f32,
    pub strafe:   f32,
    pub vertical: f32,
    /// Yaw rate, positive turns right.
    pub yaw:      f32,
    /// Camera pitch rate, positive looks down.
    pub pitch:    f32,
}

impl ManualInput {
    fn axis(v: f32) -> f32 {
        if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
    }
}

/// Advance `state` by one frame of operator control.
///
/// Planar motion follows the current heading and is normalized, so diagonal
/// input is no faster than straight input.  Ground agents ignore the
/// vertical axis and stay at `cfg.height`.
pub(crate) fn apply(state: &mut AgentState, input: ManualInput, cfg: &AgentConfig, aerial: bool, dt: f32) {
    let yaw = ManualInput::axis(input.yaw);
    let pitch = ManualInput::axis(input.pitch);
    state.orientation.rotate_yaw(yaw * cfg.rotation_speed * dt);
    state.orientation.pitch =
        (state.orientation.pitch + pitch * cfg.rotation_speed * dt).clamp(-cfg.max_tilt_deg, cfg.max_tilt_deg);

    let planar = state.orientation.forward() * ManualInput::axis(input.forward)
        + state.orientation.right() * ManualInput::axis(input.strafe);
    let mut step = planar.normalized() * (cfg.manual_speed * dt);
    if aerial {
        step += Vec3::UP * (ManualInput::axis(input.vertical) * cfg.manual_vertical_speed * dt);
    }
    state.position += step;
    if !aerial {
        state.position.y = cfg.height;
    }
}
