//! Core value types of the transition engine.
//!
//! This module contains the pieces that carry no behavior of their own:
//! - State values via the blanket `State` trait
//! - Transition endpoint patterns, including the wildcard
//! - The bounded history window

mod history;
mod state;

pub use history::{History, DEFAULT_STATE_LIMIT};
pub(crate) use state::label_from;
pub use state::{Pattern, State};
