//! Camera alert webhook.
//!
//! The detection service posts `{"camera_id": "...", "alert": true}` when a
//! camera sees an intruder.  A [`CameraRegistry`] maps camera ids to world
//! positions so a raised alert becomes an investigate command aimed at the
//! camera.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pm_core::Vec3;

use crate::{Command, CommandResult, FlightMode};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertNotice {
    pub camera_id: String,
    pub alert: bool,
}

impl AlertNotice {
    pub fn decode(text: &str) -> CommandResult<AlertNotice> {
        Ok(serde_json::from_str(text.trim())?)
    }
}

/// Camera id → world position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraRegistry {
    cameras: HashMap<String, Vec3>,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"cam_1": {"x": .., "y": .., "z": ..}, ...}`.
    pub fn from_json_str(text: &str) -> CommandResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn insert(&mut self, camera_id: impl Into<String>, position: Vec3) {
        self.cameras.insert(camera_id.into(), position);
    }

    pub fn position(&self, camera_id: &str) -> Option<Vec3> {
        self.cameras.get(camera_id).copied()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Investigate command for a raised alert, `None` for a cleared alert or
    /// an unknown camera.
    pub fn to_command(&self, notice: &AlertNotice) -> Option<Command> {
        if !notice.alert {
            return None;
        }
        let Some(position) = self.position(&notice.camera_id) else {
            warn!(camera = %notice.camera_id, "alert from unknown camera ignored");
            return None;
        };
        info!(camera = %notice.camera_id, %position, "camera alert, dispatching investigation");
        Some(Command::SetFlightMode { mode: FlightMode::Investigate, position: Some(position) })
    }
}
