//! Serializable device description.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::FREE_FLYER_DOF;
use crate::control::ControlInputMode;
use crate::device::Device;
use crate::error::{DeviceError, DeviceResult};

/// Static configuration of a [`Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    /// Number of coordinates, free-flyer included.
    #[serde(default = "default_state_size")]
    pub state_size: usize,
    #[serde(default)]
    pub control_input: ControlInputMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_velocity: Option<Vec<f64>>,
}

fn default_state_size() -> usize {
    FREE_FLYER_DOF
}

impl DeviceConfig {
    pub fn new(name: impl Into<String>, state_size: usize) -> Self {
        Self {
            name: name.into(),
            state_size,
            control_input: ControlInputMode::default(),
            initial_state: None,
            initial_velocity: None,
        }
    }

    /// Check sizes without building anything.
    ///
    /// # Errors
    ///
    /// Returns error if the state is smaller than the free-flyer block or an
    /// initial vector does not have `state_size` entries.
    pub fn validate(&self) -> DeviceResult<()> {
        if self.name.trim().is_empty() {
            return Err(DeviceError::InvalidArg {
                what: "device name must not be empty",
            });
        }
        if self.state_size < FREE_FLYER_DOF {
            return Err(DeviceError::Dimension {
                what: "state",
                expected: FREE_FLYER_DOF,
                actual: self.state_size,
            });
        }
        if let Some(q) = &self.initial_state {
            check_len("initial state", q, self.state_size)?;
        }
        if let Some(v) = &self.initial_velocity {
            check_len("initial velocity", v, self.state_size)?;
        }
        Ok(())
    }
}

fn check_len(what: &'static str, v: &[f64], expected: usize) -> DeviceResult<()> {
    if v.len() != expected {
        return Err(DeviceError::Dimension {
            what,
            expected,
            actual: v.len(),
        });
    }
    Ok(())
}

impl Device {
    /// Build an unplugged device from its configuration.
    ///
    /// The control mode is applied before the initial velocity, so an
    /// acceleration-mode device keeps the configured starting velocity.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn from_config(config: &DeviceConfig) -> DeviceResult<Self> {
        config.validate()?;
        let mut device = Device::new(config.name.clone());
        device.resize(config.state_size)?;
        device.set_control_input_type(config.control_input);
        if let Some(q) = &config.initial_state {
            device.set_state(DVector::from_column_slice(q))?;
        }
        if let Some(v) = &config.initial_velocity {
            device.set_velocity(DVector::from_column_slice(v))?;
        }
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_configured_device() {
        let config = DeviceConfig {
            control_input: ControlInputMode::Acceleration,
            initial_state: Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.3]),
            initial_velocity: Some(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5]),
            ..DeviceConfig::new("arm", 7)
        };

        let device = Device::from_config(&config).unwrap();

        assert_eq!(device.name(), "arm");
        assert_eq!(device.control_input_type(), ControlInputMode::Acceleration);
        assert_eq!(device.state()[2], 1.0);
        assert_eq!(device.state()[6], 0.3);
        assert_eq!(device.velocity()[6], 0.5);
        assert_eq!(device.free_flyer_pose()[(2, 3)], 1.0);
    }

    #[test]
    fn rejects_mismatched_initial_state() {
        let config = DeviceConfig {
            initial_state: Some(vec![0.0; 3]),
            ..DeviceConfig::new("arm", 7)
        };
        assert_eq!(
            config.validate(),
            Err(DeviceError::Dimension {
                what: "initial state",
                expected: 7,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_small_state_and_blank_name() {
        assert!(DeviceConfig::new("arm", 2).validate().is_err());
        assert!(DeviceConfig::new("  ", 6).validate().is_err());
    }
}
