//! Control input modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// How a device interprets its control vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlInputMode {
    /// Control is a joint position command, no integration.
    Position,
    /// Control is a velocity, integrated once.
    #[default]
    Velocity,
    /// Control is an acceleration, integrated twice.
    Acceleration,
}

impl ControlInputMode {
    pub const ALL: [ControlInputMode; 3] = [Self::Position, Self::Velocity, Self::Acceleration];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Velocity => "velocity",
            Self::Acceleration => "acceleration",
        }
    }
}

impl fmt::Display for ControlInputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlInputMode {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| DeviceError::UnknownControlInput { name: s.to_string() })
    }
}
