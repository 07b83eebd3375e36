//! Per-tick auxiliary commands.
//!
//! A device runs one registry before integrating and one after. Commands
//! are executed in registration order; the first failure stops the pass and
//! is reported to the caller, which is expected to log it and carry on with
//! the tick.

use std::fmt;

use sf_core::Tick;
use tracing::trace;

use crate::error::{CallbackError, SignalError, SignalResult};

/// A command run once per tick with the tick being produced.
pub type PeriodicCommand = Box<dyn FnMut(Tick) -> Result<(), CallbackError>>;

/// Ordered registry of named periodic commands.
#[derive(Default)]
pub struct PeriodicCall {
    commands: Vec<(String, PeriodicCommand)>,
}

impl PeriodicCall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under `name`.
    ///
    /// # Errors
    ///
    /// Returns error if a command with the same name is already registered.
    pub fn add(&mut self, name: impl Into<String>, command: PeriodicCommand) -> SignalResult<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(SignalError::DuplicateCommand { name });
        }
        self.commands.push((name, command));
        Ok(())
    }

    /// Remove a command. Returns `true` if it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.commands.len();
        self.commands.retain(|(n, _)| n != name);
        self.commands.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.iter().any(|(n, _)| n == name)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run every command for tick `time`, stopping at the first failure.
    pub fn run(&mut self, time: Tick) -> Result<(), CallbackError> {
        for (name, command) in &mut self.commands {
            trace!(command = %name, time, "running periodic command");
            command(time)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PeriodicCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
