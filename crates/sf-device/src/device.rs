//! The device entity: owns the state, pulls control, publishes outputs.

use std::fmt;

use nalgebra::{DVector, Matrix4};
use sf_core::{Tick, ensure_positive};
use sf_signal::{PeriodicCall, SignalSource, TimedSignal};
use tracing::{debug, trace, warn};

use crate::FREE_FLYER_DOF;
use crate::control::ControlInputMode;
use crate::error::{DeviceError, DeviceResult};
use crate::integrator::{DeviceState, StandardIntegrator, StateIntegrator};
use crate::rotation::{columns_of, pose_from_base, rpy_from_columns};

type ControlSource = Box<dyn SignalSource<DVector<f64>>>;

/// A floating-base robot advanced one control tick at a time.
///
/// The state layout is `[x, y, z, roll, pitch, yaw, q_0, ..., q_k]`. Each
/// call to [`Device::increment`] reads the control for the current tick,
/// advances the state through the device's [`StateIntegrator`] and
/// publishes `state` and `velocity` stamped with the next tick.
///
/// # Example
///
/// ```
/// use nalgebra::DVector;
/// use sf_device::{ControlInputMode, Device};
/// use sf_signal::ConstantSource;
///
/// let mut device = Device::new("robot");
/// device.resize(7).unwrap();
/// device.set_control_input_type(ControlInputMode::Velocity);
/// device.plug_control(Box::new(ConstantSource::new(DVector::from_vec(vec![1.0]))));
///
/// device.increment(0.1).unwrap();
/// assert_eq!(device.state()[6], 0.1);
/// assert_eq!(device.state_signal().time(), 1);
/// ```
pub struct Device {
    name: String,
    state: DeviceState,
    integrator: Box<dyn StateIntegrator>,
    control: Option<ControlSource>,
    last_control: Option<DVector<f64>>,
    state_out: TimedSignal<DVector<f64>>,
    velocity_out: TimedSignal<DVector<f64>>,
    before: PeriodicCall,
    after: PeriodicCall,
}

impl Device {
    /// Create a device with a bare 6-DOF free-flyer state at rest.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_integrator(name, Box::new(StandardIntegrator::new()))
    }

    /// Create a device whose state update is performed by `integrator`.
    pub fn with_integrator(name: impl Into<String>, integrator: Box<dyn StateIntegrator>) -> Self {
        let state = DeviceState::zeros(FREE_FLYER_DOF);
        Self {
            name: name.into(),
            state_out: TimedSignal::new(state.position.clone()),
            velocity_out: TimedSignal::new(state.velocity.clone()),
            state,
            integrator,
            control: None,
            last_control: None,
            before: PeriodicCall::new(),
            after: PeriodicCall::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connect the control input.
    pub fn plug_control(&mut self, source: ControlSource) {
        self.control = Some(source);
    }

    pub fn is_plugged(&self) -> bool {
        self.control.is_some()
    }

    /// Replace the state update physics.
    pub fn set_integrator(&mut self, integrator: Box<dyn StateIntegrator>) {
        self.integrator = integrator;
    }

    /// Zero-fill state and velocity with `size` coordinates.
    ///
    /// # Errors
    ///
    /// Returns error if `size` is smaller than the free-flyer block.
    pub fn resize(&mut self, size: usize) -> DeviceResult<()> {
        if size < FREE_FLYER_DOF {
            return Err(DeviceError::Dimension {
                what: "state",
                expected: FREE_FLYER_DOF,
                actual: size,
            });
        }
        self.state.position = DVector::zeros(size);
        self.state.velocity = DVector::zeros(size);
        self.state.free_flyer_pose = Matrix4::identity();
        self.state_out.set_constant(self.state.position.clone());
        self.velocity_out.set_constant(self.state.velocity.clone());
        debug!(device = %self.name, size, "device resized");
        Ok(())
    }

    /// Overwrite the generalized position.
    ///
    /// The free-flyer pose is recomputed from the new base coordinates. If
    /// the size changes, the velocity is reset to zeros of the new size.
    ///
    /// # Errors
    ///
    /// Returns error if `state` is shorter than the free-flyer block.
    pub fn set_state(&mut self, state: DVector<f64>) -> DeviceResult<()> {
        let pose = pose_from_base(&state)?;
        if state.len() != self.state.velocity.len() {
            self.state.velocity = DVector::zeros(state.len());
            self.velocity_out.set_constant(self.state.velocity.clone());
        }
        self.state.free_flyer_pose = pose;
        self.state.position = state;
        self.state_out.set_constant(self.state.position.clone());
        Ok(())
    }

    /// Overwrite the generalized velocity.
    ///
    /// # Errors
    ///
    /// Returns error if the size differs from the state size.
    pub fn set_velocity(&mut self, velocity: DVector<f64>) -> DeviceResult<()> {
        if velocity.len() != self.state.position.len() {
            return Err(DeviceError::Dimension {
                what: "velocity",
                expected: self.state.position.len(),
                actual: velocity.len(),
            });
        }
        self.state.velocity = velocity;
        self.velocity_out.set_constant(self.state.velocity.clone());
        Ok(())
    }

    /// Place the free-flyer at the homogeneous transform `root`.
    ///
    /// The translation goes into `state[0..3]`, the roll/pitch/yaw of the
    /// rotation block into `state[3..6]`. Joint coordinates are kept.
    pub fn set_root(&mut self, root: Matrix4<f64>) {
        let rpy = rpy_from_columns(&columns_of(&root));
        for i in 0..3 {
            self.state.position[i] = root[(i, 3)];
            self.state.position[3 + i] = rpy[i];
        }
        self.state.free_flyer_pose = root;
        self.state_out.set_constant(self.state.position.clone());
        debug!(device = %self.name, "root set");
    }

    /// Change how the control vector is interpreted.
    ///
    /// Switching to acceleration or position mode resets the velocity to
    /// zero. The state is never touched.
    pub fn set_control_input_type(&mut self, mode: ControlInputMode) {
        if mode != ControlInputMode::Velocity {
            self.state.velocity = DVector::zeros(self.state.position.len());
            self.velocity_out.set_constant(self.state.velocity.clone());
        }
        debug!(device = %self.name, from = %self.state.mode, to = %mode, "control input type changed");
        self.state.mode = mode;
    }

    pub fn control_input_type(&self) -> ControlInputMode {
        self.state.mode
    }

    pub fn state(&self) -> &DVector<f64> {
        &self.state.position
    }

    pub fn velocity(&self) -> &DVector<f64> {
        &self.state.velocity
    }

    pub fn free_flyer_pose(&self) -> &Matrix4<f64> {
        &self.state.free_flyer_pose
    }

    /// Full state record, including mode and pose.
    pub fn device_state(&self) -> &DeviceState {
        &self.state
    }

    /// Published state, stamped with the tick it belongs to.
    pub fn state_signal(&self) -> &TimedSignal<DVector<f64>> {
        &self.state_out
    }

    /// Published velocity, stamped with the tick it belongs to.
    pub fn velocity_signal(&self) -> &TimedSignal<DVector<f64>> {
        &self.velocity_out
    }

    /// Control sample consumed by the last tick.
    pub fn last_control(&self) -> Option<&DVector<f64>> {
        self.last_control.as_ref()
    }

    /// Tick the next [`Device::increment`] will read control at.
    pub fn time(&self) -> Tick {
        self.state_out.time()
    }

    /// Commands run at the start of every tick.
    pub fn before_mut(&mut self) -> &mut PeriodicCall {
        &mut self.before
    }

    /// Commands run at the end of every tick.
    pub fn after_mut(&mut self) -> &mut PeriodicCall {
        &mut self.after
    }

    /// Advance the device by one tick of `dt` seconds.
    ///
    /// Failures in the periodic commands are logged and do not stop the
    /// tick.
    ///
    /// # Errors
    ///
    /// Returns error if `dt` is not positive, no control source is plugged,
    /// the source fails, or the control size does not fit the state. In
    /// those cases the state and published signals are left as they were.
    pub fn increment(&mut self, dt: f64) -> DeviceResult<()> {
        ensure_positive(dt, "dt")?;
        let time = self.state_out.time();
        trace!(device = %self.name, time, "increment");

        if let Err(err) = self.before.run(time + 1) {
            warn!(device = %self.name, error = %err, "periodic command failed (before)");
        }

        let control = self
            .control
            .as_mut()
            .ok_or_else(|| DeviceError::NoControlSource {
                device: self.name.clone(),
            })?
            .access(time)?;

        self.integrator.integrate(&mut self.state, &control, dt)?;

        self.state_out.publish(self.state.position.clone(), time + 1);
        match self.state.mode {
            ControlInputMode::Acceleration => {
                self.velocity_out.publish(self.state.velocity.clone(), time + 1);
            }
            ControlInputMode::Velocity => {
                self.velocity_out.publish(control.clone(), time + 1);
            }
            ControlInputMode::Position => {}
        }
        self.last_control = Some(control);

        if let Err(err) = self.after.run(time + 1) {
            warn!(device = %self.name, error = %err, "periodic command failed (after)");
        }
        Ok(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for v in self.state.position.iter() {
            write!(f, " {v}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("plugged", &self.control.is_some())
            .field("time", &self.state_out.time())
            .field("before", &self.before)
            .field("after", &self.after)
            .finish()
    }
}
