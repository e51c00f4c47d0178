//! Juncture: a minimal transition engine
//!
//! Callers declare directed transitions between state values, each with an
//! optional start handler and exit handler, then drive the machine by
//! requesting new states. Every declared transition matching the previous and
//! the requested state runs, in declaration order.
//!
//! # Core Concepts
//!
//! - **State**: any `Clone + PartialEq + Debug` value
//! - **Pattern**: a literal state, the first-request marker, or the wildcard
//! - **Start handler**: finishes synchronously or hands back a continuation
//! - **Execution gate**: requests are dropped while a continuation is pending
//! - **History**: sliding window over the last requested states
//!
//! # Example
//!
//! ```rust
//! use juncture::{Hook, OnStart, Pattern, StateMachine, Transit};
//! use serde_json::{json, Value};
//!
//! let machine: StateMachine<&str, Value> = StateMachine::new();
//!
//! machine.declare(
//!     Pattern::Initial,
//!     "a",
//!     OnStart::handler(|_, _, _, _, _| Ok(Transit::Done(Some(json!("booted"))))),
//!     None,
//! );
//! machine.declare(
//!     "a",
//!     "b",
//!     OnStart::NoOp,
//!     Some(Hook::new(|_, from, to, args: Option<&Value>| {
//!         assert_eq!(from, Some(&"a"));
//!         assert_eq!(*to, "b");
//!         assert_eq!(args.unwrap()["hello"], "world");
//!         Ok(())
//!     })),
//! );
//!
//! machine
//!     .request("a")
//!     .unwrap()
//!     .to("b", Some(json!({ "hello": "world" })), None)
//!     .unwrap();
//!
//! assert_eq!(machine.history(), vec!["a", "b"]);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod engine;
pub mod snapshot;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use config::Config;
pub use self::core::{History, Pattern, State};
pub use engine::{
    CurrentTransition, Hook, Next, OnStart, StateMachine, Transit, Transition, TransitionError,
    TransitionId,
};
pub use snapshot::{Snapshot, SnapshotError};
