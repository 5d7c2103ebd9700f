//! `pm-agent`: one agent, one state machine.
//!
//! Drones, guards, followers and the roaming target are all [`Agent`]s; an
//! [`AgentProfile`] decides which behaviors each may use.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`agent`]   | `Agent`, `AgentBuilder`, `Role`, `TickContext`                 |
//! | [`mode`]    | `Mode`, `AgentState`, `SavedState`                             |
//! | [`event`]   | `AgentEvent` transition table, `AgentOutcome`                  |
//! | [`profile`] | `AgentProfile`, `Capabilities`, `PatrolEnd`                    |
//! | [`mission`] | `Mission`, `MissionPhase`                                      |
//! | [`manual`]  | `ManualInput`                                                  |
//! | [`gate`]    | `InterceptGate`, `GateHandle`                                  |
//! | [`target`]  | `TargetRegistry`                                               |
//! | [`roster`]  | `Roster`                                                       |
//! | [`error`]   | `AgentError`, `AgentResult`                                    |

pub mod agent;
pub mod error;
pub mod event;
pub mod gate;
pub mod manual;
pub mod mission;
pub mod mode;
pub mod profile;
pub mod roster;
pub mod target;


pub use agent::{Agent, AgentBuilder, Role, TickContext};
pub use error::{AgentError, AgentResult};
pub use event::{AgentEvent, AgentOutcome};
pub use gate::{GateHandle, InterceptGate};
pub use manual::ManualInput;
pub use mission::{Mission, MissionPhase};
pub use mode::{AgentState, Mode, SavedState};
pub use profile::{AgentProfile, Capabilities, PatrolEnd};
pub use roster::Roster;
pub use target::TargetRegistry;
