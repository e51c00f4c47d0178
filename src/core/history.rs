//! Bounded history of requested states.
//!
//! The history is a sliding window: every accepted state-change request
//! appends the requested value and the oldest entries fall off the front
//! once the window is full.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of states kept in the window.
pub const DEFAULT_STATE_LIMIT: usize = 5;

/// Sliding window over the most recently requested states.
///
/// # Example
///
/// ```rust
/// use juncture::core::History;
///
/// let mut history = History::new(3);
/// for state in 0..6 {
///     history.record(state);
/// }
///
/// assert_eq!(history.to_vec(), vec![3, 4, 5]);
/// assert_eq!(history.latest(), Some(&5));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct History<S> {
    limit: usize,
    states: VecDeque<S>,
}

impl<S: State> Default for History<S> {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_LIMIT)
    }
}

impl<S: State> History<S> {
    /// Create an empty window holding at most `limit` states.
    ///
    /// A limit of zero is clamped to one; configuration rejects zero before
    /// it ever reaches here.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            states: VecDeque::with_capacity(limit.min(DEFAULT_STATE_LIMIT)),
        }
    }

    /// Append a state, evicting from the front to stay within the limit.
    pub fn record(&mut self, state: S) {
        self.states.push_back(state);
        while self.states.len() > self.limit {
            self.states.pop_front();
        }
    }

    /// Most recently recorded state.
    pub fn latest(&self) -> Option<&S> {
        self.states.back()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    /// Copy the window into a vector, oldest first.
    pub fn to_vec(&self) -> Vec<S> {
        self.states.iter().cloned().collect()
    }
}
