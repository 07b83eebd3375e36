//! Turn validated definitions into runtime objects.

use nalgebra::DVector;
use sf_core::Tick;
use sf_device::Device;
use sf_integrators::{ScalarIntegrator, TransferFunction};
use sf_signal::{
    ConstantSource, FnSource, MotionPeriod, SampledSequence, SamplingPeriod, SignalSource,
};

use crate::ScenarioResult;
use crate::schema::{DeviceDef, IntegratorDef, ScalarSourceDef, VectorSourceDef};

pub fn build_vector_source(
    def: &VectorSourceDef,
) -> ScenarioResult<Box<dyn SignalSource<DVector<f64>>>> {
    let source: Box<dyn SignalSource<DVector<f64>>> = match def {
        VectorSourceDef::Constant { values } => {
            Box::new(ConstantSource::new(DVector::from_column_slice(values)))
        }
        VectorSourceDef::Sequence { samples } => {
            let samples: Vec<DVector<f64>> = samples
                .iter()
                .map(|s| DVector::from_column_slice(s))
                .collect();
            Box::new(SampledSequence::new(samples)?)
        }
        VectorSourceDef::Motion { params } => Box::new(MotionPeriod::from_params(params.clone())?),
    };
    Ok(source)
}

pub fn build_scalar_source(def: &ScalarSourceDef) -> ScenarioResult<Box<dyn SignalSource<f64>>> {
    let source: Box<dyn SignalSource<f64>> = match def {
        ScalarSourceDef::Constant { value } => Box::new(ConstantSource::new(*value)),
        ScalarSourceDef::Ramp { start, slope } => {
            let (start, slope) = (*start, *slope);
            Box::new(FnSource::new(move |t: Tick| start + slope * t as f64))
        }
        ScalarSourceDef::Sequence { samples } => {
            Box::new(SampledSequence::new(samples.clone())?)
        }
    };
    Ok(source)
}

/// Build a device with its control source plugged in.
pub fn build_device(def: &DeviceDef) -> ScenarioResult<Device> {
    let mut device = Device::from_config(&def.config)?;
    device.plug_control(build_vector_source(&def.control)?);
    Ok(device)
}

/// Build an integrator with its input plugged in. The history is not
/// initialised yet.
pub fn build_integrator(def: &IntegratorDef, default_period_s: f64) -> ScenarioResult<ScalarIntegrator> {
    let transfer = TransferFunction::new(def.numerator.clone(), def.denominator.clone())?;
    let period = SamplingPeriod::new(def.sampling_period_s.unwrap_or(default_period_s))?;
    let mut integrator = ScalarIntegrator::new(def.id.clone(), transfer).with_sampling_period(period);
    integrator.plug_input(build_scalar_source(&def.input)?);
    Ok(integrator)
}
