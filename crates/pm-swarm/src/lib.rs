//! `pm-swarm`: a main guard and the followers it calls in.
//!
//! # Protocol
//!
//! ```text
//! main alert ↑   spawn N followers on a ring around the main agent,
//!                open the intercept gate
//! any catch      remove target, clear main + follower alerts, close gate
//! main alert ↓   despawn every follower, close gate
//! ```
//!
//! The coordinator is stepped once per world tick, before agents tick, so a
//! freshly spawned follower moves on the same tick it appears.

pub mod coordinator;
pub mod error;

#[cfg(test)]
mod tests;

pub use coordinator::{SwarmChange, SwarmCoordinator, ring_offsets};
pub use error::{SwarmError, SwarmResult};
