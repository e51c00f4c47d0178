//! Read-only snapshots of a machine for diagnostics.
//!
//! A snapshot captures what can be inspected on a running machine: its
//! history window, the last completed state, the gate and the declared
//! patterns. Handlers are not part of it, and there is no way to rebuild a
//! machine from a snapshot.

use crate::core::{Pattern, State};
use crate::engine::StateMachine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of a machine at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<S> {
    /// Snapshot format version
    pub version: u32,

    /// Identity of the machine the snapshot was taken from
    pub machine_id: Uuid,

    pub name: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// History window, oldest first
    pub history: Vec<S>,

    pub state_limit: usize,

    /// Target of the most recently completed transition
    pub last_state: Option<S>,

    pub last_resolved_at: Option<DateTime<Utc>>,

    /// Whether a transition was pending
    pub locked: bool,

    pub strict: bool,

    /// Declared `(from, to)` patterns in table order
    pub transitions: Vec<(Pattern<S>, Pattern<S>)>,
}

impl<S: State + Serialize + DeserializeOwned> Snapshot<S> {
    /// Encode the snapshot as JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        Ok(snapshot)
    }
}

impl<S: State + 'static, A: Clone + Debug + 'static> StateMachine<S, A> {
    /// Capture the inspectable state of this machine.
    pub fn snapshot(&self) -> Snapshot<S> {
        Snapshot {
            version: SNAPSHOT_VERSION,
            machine_id: self.id(),
            name: self.name().to_string(),
            taken_at: Utc::now(),
            history: self.history(),
            state_limit: self.state_limit(),
            last_state: self.last_state(),
            last_resolved_at: self.last_resolved_at(),
            locked: self.is_locked(),
            strict: self.is_strict(),
            transitions: self.patterns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OnStart;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
    }

    fn machine() -> StateMachine<TestState, ()> {
        let machine = StateMachine::new();
        machine.declare(Pattern::Initial, TestState::Initial, OnStart::NoOp, None);
        machine.declare(TestState::Initial, TestState::Processing, OnStart::NoOp, None);
        machine
    }

    #[test]
    fn snapshot_reflects_machine() {
        let machine = machine();
        machine
            .request(TestState::Initial)
            .unwrap()
            .request(TestState::Processing)
            .unwrap();

        let snapshot = machine.snapshot();

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.machine_id, machine.id());
        assert_eq!(snapshot.name, "StateMachine");
        assert_eq!(
            snapshot.history,
            vec![TestState::Initial, TestState::Processing]
        );
        assert_eq!(snapshot.last_state, Some(TestState::Processing));
        assert!(snapshot.last_resolved_at.is_some());
        assert!(!snapshot.locked);
        assert_eq!(snapshot.transitions.len(), 2);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let machine = machine();
        machine.request(TestState::Initial).unwrap();

        let snapshot = machine.snapshot();
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::<TestState>::from_json(&json).unwrap();

        assert_eq!(snapshot, restored);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut snapshot = machine().snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        let json = snapshot.to_json().unwrap();

        let result = Snapshot::<TestState>::from_json(&json);

        assert!(matches!(
            result,
            Err(SnapshotError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = Snapshot::<TestState>::from_json("{ not json");
        assert!(matches!(result, Err(SnapshotError::DeserializationFailed(_))));
    }

    #[test]
    fn empty_machine_snapshot_has_no_state() {
        let snapshot = StateMachine::<TestState, ()>::new().snapshot();
        assert!(snapshot.history.is_empty());
        assert!(snapshot.last_state.is_none());
        assert!(snapshot.transitions.is_empty());
        assert!(snapshot.taken_at <= Utc::now());
    }
}
