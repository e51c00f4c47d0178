//! Transition records and their handlers.

use crate::core::{Pattern, State};
use crate::engine::error::TransitionError;
use crate::engine::machine::StateMachine;
use crate::engine::next::Next;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use uuid::Uuid;

/// Opaque handle returned when a transition is declared.
///
/// Handles are scoped to the machine that issued them, so a handle from one
/// machine never removes anything from another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId {
    machine: Uuid,
    seq: u64,
}

impl TransitionId {
    pub(crate) fn new(machine: Uuid, seq: u64) -> Self {
        Self { machine, seq }
    }
}

/// What a start handler reports back to the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum Transit<A> {
    /// The start finished synchronously; the exit runs right away with these args.
    Done(Option<A>),

    /// The handler kept its [`Next`] and will resolve it later.
    /// The machine stays locked until it does.
    Pending,
}

/// Signature of start handlers.
pub type StartFn<S, A> = dyn Fn(
    &StateMachine<S, A>,
    Option<&S>,
    &S,
    Option<A>,
    Next<S, A>,
) -> Result<Transit<A>, TransitionError>;

/// Signature shared by exit handlers and ready callbacks.
pub type HookFn<S, A> =
    dyn Fn(&StateMachine<S, A>, Option<&S>, &S, Option<&A>) -> Result<(), TransitionError>;

/// Start behavior of a transition.
pub enum OnStart<S, A> {
    /// Invoke the handler; its [`Transit`] decides between sync and async.
    Handler(Rc<StartFn<S, A>>),

    /// Resolve to this value without invoking anything.
    Value(A),

    /// Pass the incoming args through unchanged.
    NoOp,
}

impl<S: State + 'static, A: Clone + fmt::Debug + 'static> OnStart<S, A> {
    /// Wrap a start handler closure.
    pub fn handler<F>(start: F) -> Self
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
        Self::Handler(Rc::new(start))
    }

    /// Resolve the start to a fixed value.
    pub fn value(value: A) -> Self {
        Self::Value(value)
    }

    /// Wrap an `async` start.
    ///
    /// The future is spawned with [`tokio::task::spawn_local`]. The machine is
    /// locked until the future completes; its output becomes the args handed
    /// to the exit handler. If the future fails, the error is logged and the
    /// machine stays locked.
    ///
    /// # Panics
    ///
    /// The request that matches this transition panics unless it is made
    /// from inside a [`tokio::task::LocalSet`].
    ///
    /// ```rust
    /// use juncture::engine::{OnStart, StateMachine, TransitionError};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let local = tokio::task::LocalSet::new();
    /// local
    ///     .run_until(async {
    ///         let machine: StateMachine<&str, u32> = StateMachine::new();
    ///         machine.declare(
    ///             "idle",
    ///             "loading",
    ///             OnStart::future(|_, _, _, _| async {
    ///                 tokio::time::sleep(Duration::from_millis(5)).await;
    ///                 Ok::<_, TransitionError>(Some(200))
    ///             }),
    ///             None,
    ///         );
    ///
    ///         machine.request("idle").unwrap().request("loading").unwrap();
    ///         assert!(machine.is_locked());
    ///
    ///         tokio::time::sleep(Duration::from_millis(20)).await;
    ///         assert!(!machine.is_locked());
    ///         assert_eq!(machine.last_state(), Some("loading"));
    ///     })
    ///     .await;
    /// # }
    /// ```
    pub fn future<F, Fut>(start: F) -> Self
    where
        F: Fn(StateMachine<S, A>, Option<S>, S, Option<A>) -> Fut + 'static,
        Fut: Future<Output = Result<Option<A>, TransitionError>> + 'static,
    {
        Self::handler(move |machine, from, to, args, next| {
            let pending = start(machine.clone(), from.cloned(), to.clone(), args);
            tokio::task::spawn_local(async move {
                match pending.await {
                    Ok(args) => {
                        if let Err(error) = next.resolve(args) {
                            tracing::error!(%error, "transition continuation failed");
                        }
                    }
                    Err(error) => {
                        tracing::error!(%error, "asynchronous start failed, machine stays locked");
                    }
                }
            });
            Ok(Transit::Pending)
        })
    }
}

impl<S, A: Clone> Clone for OnStart<S, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Handler(start) => Self::Handler(Rc::clone(start)),
            Self::Value(value) => Self::Value(value.clone()),
            Self::NoOp => Self::NoOp,
        }
    }
}

impl<S, A: fmt::Debug> fmt::Debug for OnStart<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::NoOp => f.write_str("NoOp"),
        }
    }
}

/// Exit handler or ready callback.
pub struct Hook<S, A>(Rc<HookFn<S, A>>);

impl<S, A> Hook<S, A> {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&StateMachine<S, A>, Option<&S>, &S, Option<&A>) -> Result<(), TransitionError>
            + 'static,
    {
        Self(Rc::new(hook))
    }

    pub(crate) fn call(
        &self,
        machine: &StateMachine<S, A>,
        from: Option<&S>,
        to: &S,
        args: Option<&A>,
    ) -> Result<(), TransitionError> {
        (self.0)(machine, from, to, args)
    }
}

impl<S, A> Clone for Hook<S, A> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S, A> fmt::Debug for Hook<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

/// A declared transition between two state patterns.
pub struct Transition<S, A> {
    pub from: Pattern<S>,
    pub to: Pattern<S>,
    pub on_start: OnStart<S, A>,
    pub on_exit: Option<Hook<S, A>>,
}

impl<S: State, A> Transition<S, A> {
    /// Check whether this transition applies to the `(from, to)` pair.
    pub fn matches(&self, from: Option<&S>, to: &S) -> bool {
        self.from.matches_from(from) && self.to.matches_to(to)
    }
}

impl<S: Clone, A: Clone> Clone for Transition<S, A> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            on_start: self.on_start.clone(),
            on_exit: self.on_exit.clone(),
        }
    }
}

impl<S: fmt::Debug, A: fmt::Debug> fmt::Debug for Transition<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("on_start", &self.on_start)
            .field("has_exit", &self.on_exit.is_some())
            .finish()
    }
}
