//! Error types for device operations.

use sf_core::SfError;
use sf_signal::SignalError;
use thiserror::Error;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised while configuring or stepping a device.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    /// Control, state or velocity sizes are inconsistent.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    Dimension {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Unrecognised control input tag.
    #[error("Unknown control input type '{name}' (expected position, velocity or acceleration)")]
    UnknownControlInput { name: String },

    /// The device was stepped with nothing plugged into its control input.
    #[error("No control source plugged into device '{device}'")]
    NoControlSource { device: String },

    /// Invalid argument provided to a device function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Core(#[from] SfError),
}
