//! Periodic reference waveforms.
//!
//! [`MotionPeriod`] produces a vector whose components each follow an
//! independent periodic motion: constant offset, sine or cosine. Time is
//! counted in ticks, so periods are integer numbers of ticks.

use std::f64::consts::PI;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sf_core::{SfError, Tick};

use crate::error::{SignalError, SignalResult};
use crate::source::SignalSource;

/// Shape of one component's motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    #[default]
    Constant,
    Sin,
    Cos,
}

/// Parameters of one component.
///
/// Output is `init_amplitude + amplitude * f(x)` with
/// `x = ((time - init_period) % period) / period` and `f` being `1`,
/// `sin(2πx)` or `cos(2πx)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionParam {
    pub kind: MotionKind,
    pub amplitude: f64,
    /// Phase offset in ticks.
    #[serde(default)]
    pub init_period: Tick,
    /// Period in ticks, must be positive.
    pub period: Tick,
    /// Constant offset added to every sample.
    #[serde(default)]
    pub init_amplitude: f64,
}

impl Default for MotionParam {
    fn default() -> Self {
        Self {
            kind: MotionKind::Constant,
            amplitude: 0.0,
            init_period: 0,
            period: 1,
            init_amplitude: 0.0,
        }
    }
}

impl MotionParam {
    /// Value of this component at tick `time`.
    pub fn value_at(&self, time: Tick) -> f64 {
        let x = ((time - self.init_period) % self.period) as f64 / self.period as f64;
        let shape = match self.kind {
            MotionKind::Constant => 1.0,
            MotionKind::Sin => (2.0 * PI * x).sin(),
            MotionKind::Cos => (2.0 * PI * x).cos(),
        };
        self.init_amplitude + self.amplitude * shape
    }
}

/// Vector-valued periodic waveform generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionPeriod {
    params: Vec<MotionParam>,
}

impl MotionPeriod {
    /// Generator with `size` components, all at their default (zero) motion.
    pub fn new(size: usize) -> Self {
        Self {
            params: vec![MotionParam::default(); size],
        }
    }

    /// Build from explicit parameters.
    pub fn from_params(params: Vec<MotionParam>) -> SignalResult<Self> {
        if params.iter().any(|p| p.period <= 0) {
            return Err(SignalError::InvalidArg {
                what: "motion period must be positive",
            });
        }
        Ok(Self { params })
    }

    /// Reset to `size` default components.
    pub fn resize(&mut self, size: usize) {
        self.params.clear();
        self.params.resize(size, MotionParam::default());
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn param(&self, index: usize) -> Option<&MotionParam> {
        self.params.get(index)
    }

    /// Replace the parameters of one component.
    pub fn set_param(&mut self, index: usize, param: MotionParam) -> SignalResult<()> {
        if param.period <= 0 {
            return Err(SignalError::InvalidArg {
                what: "motion period must be positive",
            });
        }
        let len = self.params.len();
        let slot = self.params.get_mut(index).ok_or(SfError::IndexOob {
            what: "motion component",
            index,
            len,
        })?;
        *slot = param;
        Ok(())
    }

    /// Evaluate every component at tick `time`.
    pub fn compute(&self, time: Tick) -> DVector<f64> {
        DVector::from_iterator(self.params.len(), self.params.iter().map(|p| p.value_at(time)))
    }
}

impl SignalSource<DVector<f64>> for MotionPeriod {
    fn access(&mut self, time: Tick) -> SignalResult<DVector<f64>> {
        Ok(self.compute(time))
    }
}
