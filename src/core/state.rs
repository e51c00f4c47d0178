//! State values and the patterns transitions are declared against.
//!
//! A state is any opaque value that can be cloned, compared and printed.
//! Transitions never store states directly on their endpoints; they store a
//! [`Pattern`], which is either a literal state, the absent "before the first
//! request" marker, or the wildcard.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// Implemented for every `Clone + PartialEq + Debug` type, so plain integers,
/// string slices and user enums can all be used as states. Matching is done
/// with `PartialEq`.
///
/// # Example
///
/// ```rust
/// use juncture::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// assert_eq!(Door::Open.label(), "Open");
/// assert_eq!(42_i32.label(), "42");
/// ```
pub trait State: Clone + PartialEq + Debug {
    /// Get a human readable label for display and logging.
    fn label(&self) -> String {
        format!("{self:?}")
    }
}

impl<T: Clone + PartialEq + Debug> State for T {}

/// One side of a transition declaration.
///
/// `Any` is the wildcard. It is its own variant, so it can never be mistaken
/// for a real state value.
///
/// ```rust
/// use juncture::core::Pattern;
///
/// let literal: Pattern<&str> = "idle".into();
/// assert!(literal.matches_to(&"idle"));
/// assert!(!literal.matches_to(&"busy"));
///
/// assert!(Pattern::<&str>::Any.matches_from(None));
/// assert!(Pattern::<&str>::Initial.matches_from(None));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Pattern<S> {
    /// Matches any state.
    Any,
    /// Matches the absent previous state of the very first request.
    Initial,
    /// Matches exactly this state.
    Is(S),
}

impl<S: State> Pattern<S> {
    /// Check the pattern against the previously requested state.
    ///
    /// `None` means no state has been requested before.
    pub fn matches_from(&self, from: Option<&S>) -> bool {
        match self {
            Self::Any => true,
            Self::Initial => from.is_none(),
            Self::Is(state) => from == Some(state),
        }
    }

    /// Check the pattern against the requested target state.
    pub fn matches_to(&self, to: &S) -> bool {
        match self {
            Self::Any => true,
            Self::Initial => false,
            Self::Is(state) => state == to,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub(crate) fn label(&self) -> String {
        match self {
            Self::Any => "*".to_string(),
            Self::Initial => "<initial>".to_string(),
            Self::Is(state) => state.label(),
        }
    }
}

impl<S: State> From<S> for Pattern<S> {
    fn from(state: S) -> Self {
        Self::Is(state)
    }
}

/// Render an optional previous state for logs and errors.
pub(crate) fn label_from<S: State>(from: Option<&S>) -> String {
    from.map_or_else(|| "<initial>".to_string(), |state| state.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    #[test]
    fn label_uses_debug_representation() {
        assert_eq!(TestState::Initial.label(), "Initial");
        assert_eq!("a".label(), "\"a\"");
        assert_eq!(Some(3_i32).label(), "Some(3)");
    }

    #[test]
    fn literal_pattern_matches_equal_states_only() {
        let pattern = Pattern::Is(TestState::Processing);

        assert!(pattern.matches_to(&TestState::Processing));
        assert!(!pattern.matches_to(&TestState::Complete));
        assert!(pattern.matches_from(Some(&TestState::Processing)));
        assert!(!pattern.matches_from(Some(&TestState::Initial)));
        assert!(!pattern.matches_from(None));
    }

    #[test]
    fn wildcard_matches_everything() {
        let pattern: Pattern<TestState> = Pattern::Any;

        assert!(pattern.is_wildcard());
        assert!(pattern.matches_from(None));
        assert!(pattern.matches_from(Some(&TestState::Complete)));
        assert!(pattern.matches_to(&TestState::Initial));
    }

    #[test]
    fn initial_pattern_only_matches_missing_previous_state() {
        let pattern: Pattern<TestState> = Pattern::Initial;

        assert!(pattern.matches_from(None));
        assert!(!pattern.matches_from(Some(&TestState::Initial)));
        assert!(!pattern.matches_to(&TestState::Initial));
    }

    #[test]
    fn states_convert_into_literal_patterns() {
        let pattern: Pattern<i32> = 7.into();
        assert_eq!(pattern, Pattern::Is(7));
        assert_eq!(pattern.label(), "7");
        assert_eq!(Pattern::<i32>::Any.label(), "*");
    }

    #[test]
    fn pattern_serializes_correctly() {
        let pattern = Pattern::Is("open".to_string());
        let json = serde_json::to_string(&pattern).unwrap();
        let deserialized: Pattern<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(pattern, deserialized);
    }
}
