//! Error types for signal operations.

use sf_core::SfError;
use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while pulling, integrating or publishing signals.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    /// Invalid argument provided to a signal function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// An input was read before anything was plugged into it.
    #[error("No source plugged into {what}")]
    NoSource { what: String },

    /// A stateful block was stepped before its memory was initialised.
    #[error("{what} used before initialize()")]
    NotInitialized { what: String },

    /// A derivative output was requested from a system of too low an order.
    #[error("Integrator does not compute the derivative (denominator has {len} coefficient(s))")]
    InsufficientOrder { len: usize },

    /// A periodic command with this name is already registered.
    #[error("Periodic command '{name}' already registered")]
    DuplicateCommand { name: String },

    /// Shared numeric error.
    #[error(transparent)]
    Core(#[from] SfError),
}

/// Failure reported by one periodic command.
///
/// These never abort a control tick; the tick driver logs them and moves on.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("periodic command '{name}' failed: {message}")]
pub struct CallbackError {
    /// Name the command was registered under.
    pub name: String,
    /// Human readable reason.
    pub message: String,
}

impl CallbackError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}
