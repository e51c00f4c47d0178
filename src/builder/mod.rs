//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders for machines and transitions, as an
//! alternative to calling [`StateMachine::declare`](crate::engine::StateMachine::declare)
//! one record at a time.

pub mod error;
pub mod machine;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Pattern, State};
use crate::engine::{OnStart, Transition};

/// Create a transition with no handlers: args pass straight through.
///
/// Useful as a strict-mode declaration of an allowed step.
///
/// # Example
///
/// ```
/// use juncture::builder::{simple_transition, StateMachineBuilder};
///
/// let machine = StateMachineBuilder::<&str, ()>::new()
///     .strict(true)
///     .transitions(vec![
///         simple_transition(None, "red"),
///         simple_transition(Some("red"), "green"),
///     ])
///     .build()
///     .unwrap();
///
/// machine.request("red").unwrap().request("green").unwrap();
/// assert!(machine.request("red").is_err());
/// ```
pub fn simple_transition<S, A>(from: Option<S>, to: S) -> Transition<S, A>
where
    S: State,
{
    Transition {
        from: from.map_or(Pattern::Initial, Pattern::Is),
        to: Pattern::Is(to),
        on_start: OnStart::NoOp,
        on_exit: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Start,
        Middle,
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition::<TestState, ()>(Some(TestState::Start), TestState::Middle);

        assert_eq!(transition.from, Pattern::Is(TestState::Start));
        assert_eq!(transition.to, Pattern::Is(TestState::Middle));
        assert!(transition.matches(Some(&TestState::Start), &TestState::Middle));
        assert!(matches!(transition.on_start, OnStart::NoOp));
    }

    #[test]
    fn simple_transition_without_source_matches_first_request() {
        let transition = simple_transition::<TestState, ()>(None, TestState::Start);

        assert_eq!(transition.from, Pattern::Initial);
        assert!(transition.matches(None, &TestState::Start));
    }
}
