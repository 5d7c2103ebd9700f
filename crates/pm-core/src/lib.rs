//! `pm-core`: foundational types for the `perimeter` agent engine.
//!
//! This crate is a dependency of every other `pm-*` crate.  It has no `pm-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `TargetId`                                     |
//! | [`geo`]         | `Vec3`, `GroundPoint`, `Orientation`                      |
//! | [`time`]        | `Tick`, `SimClock`, `Deadline`                            |
//! | [`config`]      | `AgentConfig`, `SwarmConfig`, `ChannelConfig`, …          |
//! | [`error`]       | `PmError`, `PmResult`                                     |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AgentConfig, ChannelConfig, FlightConfig, MAX_GRID_RESOLUTION, MAX_RECONNECT_DELAY_SECS, SwarmConfig,
    TrackingConfig,
};
pub use error::{PmError, PmResult};
pub use geo::{GroundPoint, Orientation, Vec3};
pub use ids::{AgentId, TargetId};
pub use time::{Deadline, SimClock, Tick};
