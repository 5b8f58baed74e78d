//! Contract violations of the control API

use std::fmt;

/// Raised when a control operation is called in a state that the caller
/// should have ruled out. Policy refusals are not errors; they return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// A control mutation was requested with no active control
    ActiveControlNull,
    /// The active control's run is no longer in the active list
    ControlNotFound(String),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::ActiveControlNull => write!(f, "active control is null"),
            ControlError::ControlNotFound(id) => write!(f, "control {} not found", id),
        }
    }
}

impl std::error::Error for ControlError {}
