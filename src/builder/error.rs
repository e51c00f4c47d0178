//! Build errors for state machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition source not specified. Call .from(state), .from_any() or .from_initial()")]
    MissingFromState,

    #[error("Transition target not specified. Call .to(state) or .to_any()")]
    MissingToState,

    #[error("State limit must be at least 1")]
    ZeroStateLimit,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
