//! Scenario schema definitions.

use serde::{Deserialize, Serialize};
use sf_device::DeviceConfig;
use sf_signal::MotionParam;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    /// Control period of the device, in seconds.
    #[serde(default = "default_period_s")]
    pub period_s: f64,
    pub steps: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceDef>,
    #[serde(default)]
    pub integrators: Vec<IntegratorDef>,
}

fn default_period_s() -> f64 {
    sf_signal::sampled::DEFAULT_SAMPLING_PERIOD
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDef {
    #[serde(flatten)]
    pub config: DeviceConfig,
    pub control: VectorSourceDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegratorDef {
    pub id: String,
    pub numerator: Vec<f64>,
    pub denominator: Vec<f64>,
    /// Defaults to the scenario period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_period_s: Option<f64>,
    pub input: ScalarSourceDef,
}

/// Vector-valued control source of a device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum VectorSourceDef {
    Constant { values: Vec<f64> },
    /// One sample per tick; the last sample is held.
    Sequence { samples: Vec<Vec<f64>> },
    Motion { params: Vec<MotionParam> },
}

impl VectorSourceDef {
    /// Width of the produced vectors, if the definition is consistent.
    pub fn width(&self) -> Option<usize> {
        match self {
            VectorSourceDef::Constant { values } => Some(values.len()),
            VectorSourceDef::Sequence { samples } => {
                let first = samples.first()?.len();
                samples
                    .iter()
                    .all(|s| s.len() == first)
                    .then_some(first)
            }
            VectorSourceDef::Motion { params } => Some(params.len()),
        }
    }
}

/// Scalar input source of an integrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ScalarSourceDef {
    Constant { value: f64 },
    /// `start + slope * tick`
    Ramp {
        #[serde(default)]
        start: f64,
        slope: f64,
    },
    Sequence { samples: Vec<f64> },
}
