//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::config::Config;
use crate::core::State;
use crate::engine::{StateMachine, Transition};
use std::fmt::Debug;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S, A> {
    config: Config,
    transitions: Vec<Transition<S, A>>,
}

impl<S: State + 'static, A: Clone + Debug + 'static> StateMachineBuilder<S, A> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            transitions: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Name used in log lines.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Number of requested states kept in the history.
    pub fn state_limit(mut self, limit: usize) -> Self {
        self.config.state_limit = limit;
        self
    }

    pub fn strict(mut self, enabled: bool) -> Self {
        self.config.strict = enabled;
        self
    }

    pub fn log_level(mut self, level: Option<u8>) -> Self {
        self.config.log_level = level;
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S, A>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, A>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, A>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Build the state machine.
    ///
    /// Transitions are declared in the order they were added. Handles are
    /// not returned; use [`StateMachine::declare`] for transitions that need
    /// to be removed later.
    pub fn build(self) -> Result<StateMachine<S, A>, BuildError> {
        let machine = StateMachine::with_config(self.config)?;
        for transition in self.transitions {
            machine.add(transition);
        }
        Ok(machine)
    }
}

impl<S: State + 'static, A: Clone + Debug + 'static> Default for StateMachineBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
