//! `pm-command`: how the outside world talks to agents.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`command`] | `Command`, `FlightMode`, JSON decode / encode                |
//! | [`queue`]   | `CommandQueue`, `CommandSender`, `Inbound`                   |
//! | [`channel`] | `CommandChannel` TCP receiver thread, `ChannelStats`         |
//! | [`alert`]   | `AlertNotice`, `CameraRegistry`                              |
//! | [`error`]   | `CommandError`, `CommandResult`                              |
//!
//! # Threading
//!
//! The receiver thread only performs socket I/O and enqueues text.  Decoding
//! and every state change happen on the agent's tick thread when it drains
//! its queue.

pub mod alert;
pub mod channel;
pub mod command;
pub mod error;
pub mod queue;


pub use alert::{AlertNotice, CameraRegistry};
pub use channel::{ChannelStats, CommandChannel, MAX_LINE_BYTES, StatsSnapshot};
pub use command::{Command, FlightMode};
pub use error::{CommandError, CommandResult};
pub use queue::{CommandQueue, CommandSender, Inbound};
