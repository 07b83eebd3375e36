//! Robot device state propagation.
//!
//! A [`Device`] owns the generalized position of a floating-base robot
//! (base translation, base roll/pitch/yaw, joint coordinates) and its
//! velocity. Once per control tick it pulls a control vector and advances
//! the state by `dt` according to its [`ControlInputMode`]:
//!
//! - **position**: the control is copied onto the joints
//! - **velocity**: the control is integrated once
//! - **acceleration**: the control is integrated twice (midpoint position,
//!   forward-Euler velocity)
//!
//! When the control also covers the 6-DOF base, the base orientation is
//! advanced with an exact axis-angle rotation (see [`rotation`]).

pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod integrator;
pub mod rotation;

pub use config::DeviceConfig;
pub use control::ControlInputMode;
pub use device::Device;
pub use error::{DeviceError, DeviceResult};
pub use integrator::{DeviceState, StandardIntegrator, StateIntegrator};

/// Number of free-flyer coordinates at the head of the state vector.
pub const FREE_FLYER_DOF: usize = 6;
