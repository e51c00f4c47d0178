//! Errors raised while requesting state changes.

use thiserror::Error;

/// Errors that can occur during transitions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    /// Strict mode found no declared transition for the requested pair.
    #[error("The transition is invalid: nothing declared from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A start, exit or ready handler failed.
    #[error("Transition handler failed: {0}")]
    HandlerFailed(String),
}

impl TransitionError {
    /// Convenience constructor for handler authors.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::HandlerFailed(message.into())
    }
}
