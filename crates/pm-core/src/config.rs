//! Static, set-once agent configuration.
//!
//! Every struct here derives `Deserialize` with `#[serde(default)]`, so a
//! JSON file only needs to name the fields it overrides.  Defaults reproduce
//! the values the compound scene shipped with.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GroundPoint, PmError, PmResult, Vec3};

/// Height at which ground agents move.
pub const GROUND_HEIGHT: f32 = 4.9;

// ── TrackingConfig ────────────────────────────────────────────────────────────

/// Orbit parameters used while investigating a tracked target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Height kept above the target.
    pub height: f32,
    /// Orbit radius around the target.
    pub distance: f32,
    /// Orbit angular speed, degrees per second.
    pub orbit_speed: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { height: 10.0, distance: 5.0, orbit_speed: 30.0 }
    }
}

// ── FlightConfig ──────────────────────────────────────────────────────────────

/// Take-off and landing profile.  Present only for aerial agents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Cruise altitude above the landing pad.
    pub takeoff_height: f32,
    /// Vertical speed while descending onto the pad.
    pub landing_speed: f32,
    /// Descent stops once the agent is this close above the pad.
    pub touchdown_clearance: f32,
    /// Resting height above the pad after touchdown.
    pub rest_clearance: f32,
    /// Height above the pad at spawn.
    pub spawn_clearance: f32,
    /// Seconds between touchdown and the camera handoff signal.
    pub camera_handoff_delay_secs: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            takeoff_height:            10.0,
            landing_speed:             2.0,
            touchdown_clearance:       2.3,
            rest_clearance:            2.1,
            spawn_clearance:           2.0,
            camera_handoff_delay_secs: 3.0,
        }
    }
}

// ── SwarmConfig ───────────────────────────────────────────────────────────────

/// Alert-response parameters for a main guard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Followers spawned on the alert rising edge.
    pub followers: usize,
    /// Radius of the spawn ring around the main agent.
    pub spawn_radius: f32,
    /// Accepted for compatibility with existing scene files; has no effect.
    /// Interception readiness is granted as soon as the ring is spawned.
    pub formation_time_secs: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self { followers: 10, spawn_radius: 2.0, formation_time_secs: 0.2 }
    }
}

// ── AgentConfig ───────────────────────────────────────────────────────────────

/// Largest accepted `grid_resolution`; the grid holds up to its square.
pub const MAX_GRID_RESOLUTION: u32 = 1_000;

/// Per-agent configuration: boundary, speeds, delays and home anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Boundary vertices in ground-plane order.  At least three are required
    /// for a usable patrol grid.
    pub boundary: Vec<GroundPoint>,

    /// Grid samples per axis.
    pub grid_resolution: u32,

    /// Inset applied to the boundary's bounding box before sampling.
    pub padding: f32,

    /// Height of generated patrol points.  Ground agents are pinned to it.
    pub height: f32,

    /// Add points sampled along boundary edges to the grid.
    pub edge_sampling: bool,

    pub speed:                 f32,
    pub intercept_speed:       f32,
    pub intercept_distance:    f32,
    pub manual_speed:          f32,
    pub manual_vertical_speed: f32,
    /// Yaw rate under manual control, degrees per second per unit input.
    pub rotation_speed:        f32,
    /// Camera pitch limit under manual control, degrees either side of level.
    pub max_tilt_deg:          f32,

    /// Seconds after spawn before the mission starts.
    pub start_delay_secs: f32,

    /// Distance at which a waypoint counts as reached.
    pub arrival_epsilon: f32,

    /// Trailer (ground) or landing pad (aerial).  Required for the return leg.
    pub home: Option<Vec3>,

    pub tracking: TrackingConfig,

    /// Take-off / landing profile; `None` for ground agents.
    pub flight: Option<FlightConfig>,

    pub swarm: SwarmConfig,

    /// Emit a `debug!` state line every N frames.  0 disables it.
    pub state_log_interval_frames: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            boundary:                  default_boundary(),
            grid_resolution:           20,
            padding:                   1.0,
            height:                    GROUND_HEIGHT,
            edge_sampling:             false,
            speed:                     5.0,
            intercept_speed:           7.0,
            intercept_distance:        1.0,
            manual_speed:              8.0,
            manual_vertical_speed:     5.0,
            rotation_speed:            300.0,
            max_tilt_deg:              45.0,
            start_delay_secs:          11.0,
            arrival_epsilon:           0.1,
            home:                      None,
            tracking:                  TrackingConfig::default(),
            flight:                    None,
            swarm:                     SwarmConfig::default(),
            state_log_interval_frames: 100,
        }
    }
}

impl AgentConfig {
    /// Ground guard parked at `trailer`.
    pub fn guard(trailer: Vec3) -> Self {
        Self {
            home: Some(trailer.with_y(GROUND_HEIGHT)),
            ..Self::default()
        }
    }

    /// Aerial drone based on `pad`.  Patrol points sit at cruise altitude
    /// and include samples along the boundary edges.
    pub fn drone(pad: Vec3) -> Self {
        let flight = FlightConfig::default();
        Self {
            height:        pad.y + flight.takeoff_height,
            edge_sampling: true,
            home:          Some(pad),
            flight:        Some(flight),
            ..Self::default()
        }
    }

    /// Slow ground patroller with no home anchor (the roaming target).
    pub fn patroller() -> Self {
        Self { speed: 3.0, ..Self::default() }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> PmResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Like [`from_json_str`](Self::from_json_str) but reads from a file.
    pub fn load_json(path: &Path) -> PmResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check values that would make movement meaningless.
    ///
    /// Callers log the error and carry on with degraded behavior; nothing
    /// here is fatal.
    pub fn validate(&self) -> PmResult<()> {
        let positive = [
            ("speed", self.speed),
            ("intercept_speed", self.intercept_speed),
            ("intercept_distance", self.intercept_distance),
            ("arrival_epsilon", self.arrival_epsilon),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PmError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.boundary.len() < 3 {
            return Err(PmError::Config(format!(
                "boundary needs at least 3 vertices, got {}",
                self.boundary.len()
            )));
        }
        if self.grid_resolution > MAX_GRID_RESOLUTION {
            return Err(PmError::Config(format!(
                "grid_resolution must be <= {MAX_GRID_RESOLUTION}, got {}",
                self.grid_resolution
            )));
        }
        if !self.start_delay_secs.is_finite() || self.start_delay_secs < 0.0 {
            return Err(PmError::Config(format!(
                "start_delay_secs must be >= 0, got {}",
                self.start_delay_secs
            )));
        }
        Ok(())
    }
}

/// The hexagonal compound outline.
fn default_boundary() -> Vec<GroundPoint> {
    vec![
        GroundPoint::new(0.0, 0.0),
        GroundPoint::new(10.0, 0.0),
        GroundPoint::new(15.0, 15.0),
        GroundPoint::new(0.0, 20.0),
        GroundPoint::new(-15.0, 15.0),
        GroundPoint::new(-10.0, 0.0),
    ]
}

// ── ChannelConfig ─────────────────────────────────────────────────────────────

const DEFAULT_RECONNECT_DELAY_SECS: f32 = 5.0;

/// Longest accepted wait between connection attempts.
pub const MAX_RECONNECT_DELAY_SECS: f32 = 3_600.0;

/// Command-channel connection parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Controller address, `host:port`.
    pub server_addr: String,
    /// Fixed wait between connection attempts.  No backoff, no retry cap.
    pub reconnect_delay_secs: f32,
    /// Sent once in the identification handshake.
    pub client_type: String,
    pub connect_timeout_ms: u64,
    /// Upper bound on the wait for the receiver thread at shutdown.
    pub join_timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            server_addr:          "127.0.0.1:5555".to_owned(),
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY_SECS,
            client_type:          "unity_drone".to_owned(),
            connect_timeout_ms:   2_000,
            join_timeout_ms:      1_000,
        }
    }
}

impl ChannelConfig {
    /// Wait between connection attempts.
    ///
    /// Negative values mean no wait.  NaN and values above
    /// [`MAX_RECONNECT_DELAY_SECS`] fall back to the 5 s default.
    pub fn reconnect_delay(&self) -> Duration {
        match self.reconnect_delay_secs {
            s if s.is_nan() || s > MAX_RECONNECT_DELAY_SECS => {
                Duration::from_secs_f32(DEFAULT_RECONNECT_DELAY_SECS)
            }
            s => Duration::from_secs_f32(s.max(0.0)),
        }
    }

    /// Check values the receiver thread cannot use as given.
    pub fn validate(&self) -> PmResult<()> {
        if self.server_addr.trim().is_empty() {
            return Err(PmError::Config("server_addr is empty".to_owned()));
        }
        let delay = self.reconnect_delay_secs;
        if !(delay.is_finite() && (0.0..=MAX_RECONNECT_DELAY_SECS).contains(&delay)) {
            return Err(PmError::Config(format!(
                "reconnect_delay_secs must be in 0..={MAX_RECONNECT_DELAY_SECS}, got {delay}"
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    #[inline]
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}
