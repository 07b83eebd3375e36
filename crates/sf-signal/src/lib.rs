//! Signal primitives shared by stepflow's numerical blocks.
//!
//! The numerical cores (transfer-function integrators, robot devices) do not
//! schedule themselves. They are driven once per control cycle by an outer
//! loop and talk to the rest of the control graph through a small set of
//! interfaces defined here.
//!
//! # Architecture
//!
//! - Inputs are [`SignalSource`]s: "give me the sample for tick `t`"
//! - Outputs are [`TimedSignal`]s: a value plus the tick it belongs to
//! - Physical time per tick is a [`SamplingPeriod`]
//! - Auxiliary per-tick work is registered in a [`PeriodicCall`]
//! - [`MotionPeriod`] is a ready-made periodic waveform source

pub mod error;
pub mod motion;
pub mod periodic;
pub mod sampled;
pub mod signal;
pub mod source;

pub use error::{CallbackError, SignalError, SignalResult};
pub use motion::{MotionKind, MotionParam, MotionPeriod};
pub use periodic::{PeriodicCall, PeriodicCommand};
pub use sampled::SamplingPeriod;
pub use signal::TimedSignal;
pub use source::{ConstantSource, FnSource, SampledSequence, SignalSource};
