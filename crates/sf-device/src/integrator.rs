//! State update physics of a device.
//!
//! [`StateIntegrator`] is the seam where the per-tick update can be
//! replaced wholesale. [`StandardIntegrator`] implements the three control
//! modes with free-flyer rotation integration.

use nalgebra::{DVector, Matrix4};
use tracing::trace;

use crate::FREE_FLYER_DOF;
use crate::control::ControlInputMode;
use crate::error::{DeviceError, DeviceResult};
use crate::rotation::integrate_roll_pitch_yaw;

/// State owned by a device and advanced once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    /// Generalized position: `[0..3]` base translation, `[3..6]` base
    /// roll/pitch/yaw, `[6..]` joint coordinates.
    pub position: DVector<f64>,
    /// Generalized velocity, same layout and size as `position`.
    pub velocity: DVector<f64>,
    /// Base pose matching `position[0..6]` after the last rotation update.
    pub free_flyer_pose: Matrix4<f64>,
    /// How the control vector is interpreted.
    pub mode: ControlInputMode,
}

impl DeviceState {
    /// Zero state of `size` coordinates.
    pub fn zeros(size: usize) -> Self {
        Self {
            position: DVector::zeros(size),
            velocity: DVector::zeros(size),
            free_flyer_pose: Matrix4::identity(),
            mode: ControlInputMode::default(),
        }
    }

    /// Number of joint coordinates after the free-flyer block.
    pub fn joint_count(&self) -> usize {
        self.position.len().saturating_sub(FREE_FLYER_DOF)
    }
}

/// Advances a [`DeviceState`] by one control step.
pub trait StateIntegrator {
    /// Update `state` in place from `control` over `dt` seconds.
    ///
    /// Implementations must leave `state` untouched when they return an
    /// error.
    fn integrate(
        &mut self,
        state: &mut DeviceState,
        control: &DVector<f64>,
        dt: f64,
    ) -> DeviceResult<()>;
}

/// Joint-space Euler integration with exact free-flyer rotation.
///
/// The control covers either the joints only (`len = state - 6`) or the
/// whole state including the base (`len = state`). In the latter case the
/// first six entries drive the base through
/// [`integrate_roll_pitch_yaw`].
///
/// In acceleration mode the position is advanced with the midpoint
/// velocity `v + a dt / 2` while the stored velocity takes the full
/// forward-Euler step `v + a dt`. The position is then exact for constant
/// acceleration.
#[derive(Debug, Clone, Default)]
pub struct StandardIntegrator {
    /// Velocity actually applied to the position this tick.
    vel_control: DVector<f64>,
}

impl StandardIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Velocity applied to the position during the last step.
    pub fn applied_velocity(&self) -> &DVector<f64> {
        &self.vel_control
    }

    fn integrate_position_command(
        state: &mut DeviceState,
        control: &DVector<f64>,
    ) -> DeviceResult<()> {
        let n = state.position.len();
        if n != control.len() + FREE_FLYER_DOF {
            return Err(DeviceError::Dimension {
                what: "position control",
                expected: state.joint_count(),
                actual: control.len(),
            });
        }
        state.position.rows_mut(FREE_FLYER_DOF, control.len()).copy_from(control);
        Ok(())
    }

    fn check_control(state: &DeviceState, control: &DVector<f64>) -> DeviceResult<()> {
        let n = state.position.len();
        if n < FREE_FLYER_DOF {
            return Err(DeviceError::Dimension {
                what: "state",
                expected: FREE_FLYER_DOF,
                actual: n,
            });
        }
        if control.len() != n && control.len() + FREE_FLYER_DOF != n {
            return Err(DeviceError::Dimension {
                what: "control",
                expected: n,
                actual: control.len(),
            });
        }
        if state.mode == ControlInputMode::Acceleration && state.velocity.len() != n {
            return Err(DeviceError::Dimension {
                what: "velocity",
                expected: n,
                actual: state.velocity.len(),
            });
        }
        Ok(())
    }
}

impl StateIntegrator for StandardIntegrator {
    fn integrate(
        &mut self,
        state: &mut DeviceState,
        control: &DVector<f64>,
        dt: f64,
    ) -> DeviceResult<()> {
        if state.mode == ControlInputMode::Position {
            return Self::integrate_position_command(state, control);
        }
        Self::check_control(state, control)?;

        if self.vel_control.len() != control.len() {
            self.vel_control = DVector::zeros(control.len());
        }

        let mut offset = FREE_FLYER_DOF;
        if state.mode == ControlInputMode::Acceleration {
            if control.len() == state.velocity.len() {
                offset = 0;
            }
            for i in 0..control.len() {
                self.vel_control[i] = state.velocity[i + offset] + control[i] * dt * 0.5;
                state.velocity[i + offset] += control[i] * dt;
            }
        } else {
            self.vel_control.copy_from(control);
        }

        if self.vel_control.len() == state.position.len() {
            offset = 0;
            integrate_roll_pitch_yaw(
                &mut state.position,
                &self.vel_control,
                dt,
                &mut state.free_flyer_pose,
            )?;
        }

        for i in FREE_FLYER_DOF..state.position.len() {
            state.position[i] += self.vel_control[i - offset] * dt;
        }

        trace!(mode = %state.mode, dt, "state integrated");
        Ok(())
    }
}
