//! The transition engine.
//!
//! A machine owns three pieces of state: an ordered transition table, a
//! bounded history of requested states, and an execution gate.
//!
//! # Resolution
//!
//! Every accepted request starts a fresh resolution pass over the table.
//! Each record whose patterns match (previous request, requested state) runs
//! start, then exit, then the caller's ready callback. A start handler may
//! finish synchronously with [`Transit::Done`] or keep its [`Next`] and return
//! [`Transit::Pending`]; the machine is then locked, dropping new requests,
//! until the continuation is resolved.
//!
//! A request issued from inside a handler while the machine is unlocked
//! starts a new pass immediately and the outer pass stops scanning.

mod error;
mod machine;
mod next;
mod transition;

pub use error::TransitionError;
pub use machine::{CurrentTransition, StateMachine};
pub use next::Next;
pub use transition::{Hook, HookFn, OnStart, StartFn, Transit, Transition, TransitionId};
