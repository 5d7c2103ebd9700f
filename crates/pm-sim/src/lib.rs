//! `pm-sim`: tick loop orchestrator for the `perimeter` agent engine.
//!
//! # Tick loop
//!
//! ```text
//! every frame (dt):
//!   ① Swarms     each coordinator reacts to its main agent's alert edge:
//!                rising → spawn the follower ring, open the gate;
//!                falling → despawn followers, close the gate.
//!   ② Targets    bound targets copy their agent's position.
//!   ③ Agents     Agent::tick for every agent in ascending AgentId order.
//!   ④ Apply      outcomes in the same order:
//!                  ModeChanged      → observer
//!                  Caught(t)        → swarm cleanup, target removed,
//!                                     bound agent despawned
//!                  MissionComplete  → observer
//!                  CameraHandoff    → observer
//!   ⑤ Clock      advance by dt.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pm_sim::{NoopObserver, WorldBuilder};
//!
//! let mut world = WorldBuilder::new().swarm_leader(guard).target_agent(bear).build()?;
//! world.raise_alert(AgentId(0), world.target_of(AgentId(1)).unwrap())?;
//! world.run_ticks(600, 1.0 / 60.0, &mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod world;


pub use builder::WorldBuilder;
pub use error::{WorldError, WorldResult};
pub use observer::{NoopObserver, WorldObserver};
pub use world::World;
