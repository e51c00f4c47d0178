//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Pattern, State};
use crate::engine::{Hook, Next, OnStart, StateMachine, Transit, Transition, TransitionError};
use std::fmt::Debug;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S, A> {
    from: Option<Pattern<S>>,
    to: Option<Pattern<S>>,
    on_start: OnStart<S, A>,
    on_exit: Option<Hook<S, A>>,
}

impl<S: State + 'static, A: Clone + Debug + 'static> TransitionBuilder<S, A> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            on_start: OnStart::NoOp,
            on_exit: None,
        }
    }

    /// Set the source state.
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(Pattern::Is(state));
        self
    }

    /// Match any source state.
    pub fn from_any(mut self) -> Self {
        self.from = Some(Pattern::Any);
        self
    }

    /// Match only the very first request, when no state was requested before.
    pub fn from_initial(mut self) -> Self {
        self.from = Some(Pattern::Initial);
        self
    }

    /// Set the target state.
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(Pattern::Is(state));
        self
    }

    /// Match any target state.
    pub fn to_any(mut self) -> Self {
        self.to = Some(Pattern::Any);
        self
    }

    /// Run a start handler. Without one, args pass through unchanged.
    pub fn on_start<F>(mut self, start: F) -> Self
    where
        F: Fn(
                &StateMachine<S, A>,
                Option<&S>,
                &S,
                Option<A>,
                Next<S, A>,
            ) -> Result<Transit<A>, TransitionError>
            + 'static,
    {
        self.on_start = OnStart::handler(start);
        self
    }

    /// Resolve the start to a fixed value.
    pub fn start_with(mut self, value: A) -> Self {
        self.on_start = OnStart::value(value);
        self
    }

    /// Set an exit handler.
    pub fn on_exit<F>(mut self, exit: F) -> Self
    where
        F: Fn(&StateMachine<S, A>, Option<&S>, &S, Option<&A>) -> Result<(), TransitionError>
            + 'static,
    {
        self.on_exit = Some(Hook::new(exit));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, A>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition {
            from,
            to,
            on_start: self.on_start,
            on_exit: self.on_exit,
        })
    }
}

impl<S: State + 'static, A: Clone + Debug + 'static> Default for TransitionBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Idle,
        Running,
        Done,
    }

    #[test]
    fn builder_validates_missing_from() {
        let result = TransitionBuilder::<TestState, ()>::new()
            .to(TestState::Running)
            .build();

        assert!(matches!(result, Err(BuildError::MissingFromState)));
    }

    #[test]
    fn builder_validates_missing_to() {
        let result = TransitionBuilder::<TestState, ()>::new()
            .from(TestState::Idle)
            .build();

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn fluent_api_builds_transition() {
        let transition = TransitionBuilder::<TestState, u8>::new()
            .from(TestState::Idle)
            .to(TestState::Running)
            .start_with(4)
            .on_exit(|_, _, _, _| Ok(()))
            .build()
            .unwrap();

        assert_eq!(transition.from, Pattern::Is(TestState::Idle));
        assert_eq!(transition.to, Pattern::Is(TestState::Running));
        assert!(matches!(transition.on_start, OnStart::Value(4)));
        assert!(transition.on_exit.is_some());
    }

    #[test]
    fn wildcard_helpers_set_patterns() {
        let transition = TransitionBuilder::<TestState, ()>::new()
            .from_any()
            .to_any()
            .build()
            .unwrap();

        assert!(transition.matches(Some(&TestState::Done), &TestState::Idle));

        let boot = TransitionBuilder::<TestState, ()>::new()
            .from_initial()
            .to(TestState::Idle)
            .build()
            .unwrap();

        assert!(boot.matches(None, &TestState::Idle));
        assert!(!boot.matches(Some(&TestState::Done), &TestState::Idle));
    }

    #[test]
    fn default_start_is_noop() {
        let transition = TransitionBuilder::<TestState, ()>::new()
            .from(TestState::Running)
            .to(TestState::Done)
            .build()
            .unwrap();

        assert!(matches!(transition.on_start, OnStart::NoOp));
        assert!(transition.on_exit.is_none());
    }
}
