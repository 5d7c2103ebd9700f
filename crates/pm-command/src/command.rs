//! Typed command wire format.
//!
//! ```json
//! {"command_type": "set_flight_mode", "parameters": {"mode": "investigate", "position": {"x": 1.0, "y": 0.0, "z": 2.0}}}
//! {"command_type": "navigate_to",     "parameters": {"position": {"x": 1.0, "y": 0.0, "z": 2.0}}}
//! ```
//!
//! Messages are decoded once at the queue boundary; agents only ever see
//! [`Command`] values.

use serde::{Deserialize, Serialize};

use pm_core::Vec3;

use crate::{CommandError, CommandResult};

/// Requested behavior for `set_flight_mode`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightMode {
    Investigate,
    Patrol,
    Manual,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command_type", content = "parameters", rename_all = "snake_case")]
pub enum Command {
    SetFlightMode {
        mode: FlightMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec3>,
    },
    NavigateTo {
        position: Vec3,
    },
}

impl Command {
    /// Decode one message.  Surrounding whitespace is ignored.
    ///
    /// Out-of-range numbers parse as infinities, so every position is
    /// checked before the command is accepted.
    pub fn decode(text: &str) -> CommandResult<Command> {
        let cmd: Command = serde_json::from_str(text.trim())?;
        cmd.validate()?;
        Ok(cmd)
    }

    /// Reject commands carrying a non-finite position.
    pub fn validate(&self) -> CommandResult<()> {
        match self.position() {
            Some(p) if !p.is_finite() => Err(CommandError::NonFinite(p)),
            _ => Ok(()),
        }
    }

    /// The position parameter, if the command has one.
    pub fn position(&self) -> Option<Vec3> {
        match self {
            Command::SetFlightMode { position, .. } => *position,
            Command::NavigateTo { position } => Some(*position),
        }
    }

    /// Encode as a single JSON line without the trailing newline.
    pub fn to_wire(&self) -> CommandResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
