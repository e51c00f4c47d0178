//! State machine that resolves and runs declared transitions.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::Config;
use crate::core::{label_from, History, Pattern, State};
use crate::engine::error::TransitionError;
use crate::engine::next::Next;
use crate::engine::transition::{Hook, OnStart, Transit, Transition, TransitionId};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// The transition currently being executed.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentTransition<S, A> {
    /// Previously requested state, `None` on the first request
    pub from: Option<S>,
    /// Requested state
    pub to: S,
    /// Args handed to the start handler
    pub args: Option<A>,
}

/// One resolution pass, created per accepted state-change request.
pub(crate) struct Pass<S, A> {
    generation: u64,
    from: Option<S>,
    to: S,
    on_ready: Option<Hook<S, A>>,
}

struct Entry<S, A> {
    id: TransitionId,
    transition: Rc<Transition<S, A>>,
}

struct Inner<S, A> {
    table: Vec<Entry<S, A>>,
    next_seq: u64,
    history: History<S>,
    previous: Option<S>,
    locked: bool,
    cursor: usize,
    generation: u64,
    strict: bool,
    log_level: Option<u8>,
    current: Option<CurrentTransition<S, A>>,
    last_state: Option<S>,
    last_resolved_at: Option<DateTime<Utc>>,
}

struct Shared<S, A> {
    id: Uuid,
    name: String,
    inner: RefCell<Inner<S, A>>,
}

/// Transition engine.
///
/// `StateMachine` is a cheap handle: clones share the same transition table,
/// history and execution gate. Handlers receive the handle and may declare,
/// remove or request while a transition runs.
///
/// # Example
///
/// ```rust
/// use juncture::engine::{Hook, OnStart, StateMachine, Transit};
/// use juncture::core::Pattern;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let machine: StateMachine<&str, String> = StateMachine::new();
///
/// let log = Rc::clone(&seen);
/// machine.declare(
///     Pattern::Any,
///     "open",
///     OnStart::handler(|_, _, _, _, _| Ok(Transit::Done(Some("creak".to_string())))),
///     Some(Hook::new(move |_, _, to, args| {
///         log.borrow_mut().push(format!("{to} {}", args.unwrap()));
///         Ok(())
///     })),
/// );
///
/// machine.request("closed").unwrap().request("open").unwrap();
///
/// assert_eq!(*seen.borrow(), vec!["open creak".to_string()]);
/// assert_eq!(machine.history(), vec!["closed", "open"]);
/// ```
pub struct StateMachine<S, A> {
    shared: Rc<Shared<S, A>>,
}

/// Non-owning handle held by pending continuations.
pub(crate) struct WeakMachine<S, A>(Weak<Shared<S, A>>);

impl<S, A> WeakMachine<S, A> {
    pub(crate) fn upgrade(&self) -> Option<StateMachine<S, A>> {
        self.0.upgrade().map(|shared| StateMachine { shared })
    }
}

impl<S, A> StateMachine<S, A> {
    pub(crate) fn downgrade(&self) -> WeakMachine<S, A> {
        WeakMachine(Rc::downgrade(&self.shared))
    }
}

impl<S, A> Clone for StateMachine<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S: State + 'static, A: Clone + fmt::Debug + 'static> Default for StateMachine<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State + 'static, A: Clone + fmt::Debug + 'static> StateMachine<S, A> {
    /// Create a machine with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    /// Create a machine from a configuration, validating it first.
    pub fn with_config(config: Config) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Start a fluent builder.
    pub fn builder() -> StateMachineBuilder<S, A> {
        StateMachineBuilder::new()
    }

    fn from_valid_config(config: Config) -> Self {
        let inner = Inner {
            table: Vec::new(),
            next_seq: 0,
            history: History::new(config.state_limit),
            previous: None,
            locked: false,
            cursor: 0,
            generation: 0,
            strict: config.strict,
            log_level: config.log_level,
            current: None,
            last_state: None,
            last_resolved_at: None,
        };
        Self {
            shared: Rc::new(Shared {
                id: Uuid::new_v4(),
                name: config.name,
                inner: RefCell::new(inner),
            }),
        }
    }

    /// Declare a transition and return its handle.
    ///
    /// Nothing is validated: duplicates and overlapping wildcards are
    /// allowed and run in declaration order.
    pub fn declare(
        &self,
        from: impl Into<Pattern<S>>,
        to: impl Into<Pattern<S>>,
        on_start: OnStart<S, A>,
        on_exit: Option<Hook<S, A>>,
    ) -> TransitionId {
        self.add(Transition {
            from: from.into(),
            to: to.into(),
            on_start,
            on_exit,
        })
    }

    /// Append a pre-built transition and return its handle.
    pub fn add(&self, transition: Transition<S, A>) -> TransitionId {
        let mut inner = self.shared.inner.borrow_mut();
        let id = TransitionId::new(self.shared.id, inner.next_seq);
        inner.next_seq += 1;
        inner.table.push(Entry {
            id,
            transition: Rc::new(transition),
        });
        id
    }

    /// Remove the transition with this handle. Unknown handles are ignored.
    pub fn remove(&self, id: TransitionId) -> &Self {
        let mut inner = self.shared.inner.borrow_mut();
        if let Some(position) = inner.table.iter().position(|entry| entry.id == id) {
            inner.table.remove(position);
        }
        self
    }

    /// Request a move to `state`.
    ///
    /// While a transition is pending the request is dropped and nothing
    /// changes. Otherwise the state is recorded in the history and every
    /// declared transition matching (previous request, `state`) runs, in
    /// declaration order. `on_ready` is called after each matched
    /// transition's exit handler.
    ///
    /// In strict mode a request with no matching declaration fails with
    /// [`TransitionError::InvalidTransition`] and leaves the history alone.
    /// Errors returned by handlers are propagated as they are.
    pub fn to(
        &self,
        state: S,
        args: Option<A>,
        on_ready: Option<Hook<S, A>>,
    ) -> Result<&Self, TransitionError> {
        if self.is_locked() {
            self.log(0, format_args!("dropped request for {}", state.label()));
            return Ok(self);
        }

        let pass = {
            let mut inner = self.shared.inner.borrow_mut();

            if inner.strict {
                let previous = inner.previous.as_ref();
                let declared = inner
                    .table
                    .iter()
                    .any(|entry| entry.transition.matches(previous, &state));
                if !declared {
                    return Err(TransitionError::InvalidTransition {
                        from: label_from(previous),
                        to: state.label(),
                    });
                }
            }

            inner.history.record(state.clone());
            let from = inner.previous.replace(state.clone());
            inner.generation += 1;
            inner.cursor = 0;

            Rc::new(Pass {
                generation: inner.generation,
                from,
                to: state,
                on_ready,
            })
        };

        self.scan(&pass, args)?;
        Ok(self)
    }

    /// Request a move to `state` without args or ready callback.
    pub fn request(&self, state: S) -> Result<&Self, TransitionError> {
        self.to(state, None, None)
    }

    /// Scan the table from the cursor, running every match of the pass.
    pub(crate) fn scan(
        &self,
        pass: &Rc<Pass<S, A>>,
        mut args: Option<A>,
    ) -> Result<(), TransitionError> {
        loop {
            let (index, transition) = {
                let inner = self.shared.inner.borrow();
                if inner.generation != pass.generation {
                    return Ok(());
                }
                let index = inner.cursor;
                match inner.table.get(index) {
                    Some(entry) => (index, Rc::clone(&entry.transition)),
                    None => return Ok(()),
                }
            };

            if !transition.matches(pass.from.as_ref(), &pass.to) {
                if !self.advance(pass, index) {
                    return Ok(());
                }
                continue;
            }

            self.shared.inner.borrow_mut().current = Some(CurrentTransition {
                from: pass.from.clone(),
                to: pass.to.clone(),
                args: args.clone(),
            });
            self.log(0, format_args!("before start {}", describe(args.as_ref())));

            let fired = Rc::new(Cell::new(false));
            let outcome = match &transition.on_start {
                OnStart::Handler(start) => {
                    let next = Next::new(
                        self,
                        Rc::clone(pass),
                        index,
                        Rc::clone(&transition),
                        Rc::clone(&fired),
                    );
                    start(self, pass.from.as_ref(), &pass.to, args, next)?
                }
                OnStart::Value(value) => Transit::Done(Some(value.clone())),
                OnStart::NoOp => Transit::Done(args),
            };

            match outcome {
                Transit::Done(resolved) => {
                    // The handler already resolved its continuation itself.
                    if fired.replace(true) {
                        return Ok(());
                    }
                    if !self.complete(pass, index, &transition, resolved.as_ref())? {
                        return Ok(());
                    }
                    args = resolved;
                }
                Transit::Pending => {
                    if !fired.get() {
                        self.shared.inner.borrow_mut().locked = true;
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Run the continuation of a matched transition.
    ///
    /// Returns whether the pass should keep scanning.
    pub(crate) fn complete(
        &self,
        pass: &Pass<S, A>,
        index: usize,
        transition: &Transition<S, A>,
        args: Option<&A>,
    ) -> Result<bool, TransitionError> {
        {
            let mut inner = self.shared.inner.borrow_mut();
            inner.locked = false;
            inner.last_state = Some(pass.to.clone());
            inner.last_resolved_at = Some(Utc::now());
        }
        self.log(0, "after start");

        if let Some(exit) = &transition.on_exit {
            self.log(0, format_args!("before exit {}", describe(args)));
            exit.call(self, pass.from.as_ref(), &pass.to, args)?;
            self.log(0, "after exit");
        }
        if let Some(ready) = &pass.on_ready {
            ready.call(self, pass.from.as_ref(), &pass.to, args)?;
        }

        Ok(self.advance(pass, index))
    }

    /// Move the cursor past `index` if the pass still owns it.
    fn advance(&self, pass: &Pass<S, A>, index: usize) -> bool {
        let mut inner = self.shared.inner.borrow_mut();
        if inner.generation != pass.generation || inner.cursor != index {
            return false;
        }
        inner.cursor += 1;
        inner.cursor < inner.table.len()
    }

    /// Enable or disable strict mode.
    pub fn set_strict(&self, enabled: bool) -> &Self {
        self.shared.inner.borrow_mut().strict = enabled;
        self
    }

    /// Set the log threshold; `None` disables logging.
    pub fn set_log_level(&self, level: Option<u8>) {
        self.shared.inner.borrow_mut().log_level = level;
    }

    /// Emit a log line if `level` reaches the configured threshold.
    ///
    /// Lines carry the machine name and the current transition.
    pub fn log(&self, level: u8, message: impl fmt::Display) {
        let (from, to) = {
            let inner = self.shared.inner.borrow();
            match inner.log_level {
                Some(threshold) if level >= threshold => {}
                _ => return,
            }
            match &inner.current {
                Some(current) => (label_from(current.from.as_ref()), current.to.label()),
                None => (String::from("-"), String::from("-")),
            }
        };
        tracing::debug!(machine = %self.shared.name, %from, %to, "{message}");
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Requested states, oldest first.
    pub fn history(&self) -> Vec<S> {
        self.shared.inner.borrow().history.to_vec()
    }

    pub fn state_limit(&self) -> usize {
        self.shared.inner.borrow().history.limit()
    }

    pub fn is_locked(&self) -> bool {
        self.shared.inner.borrow().locked
    }

    pub fn is_strict(&self) -> bool {
        self.shared.inner.borrow().strict
    }

    pub fn log_level(&self) -> Option<u8> {
        self.shared.inner.borrow().log_level
    }

    /// The transition most recently started.
    pub fn current(&self) -> Option<CurrentTransition<S, A>> {
        self.shared.inner.borrow().current.clone()
    }

    /// Target state of the most recently completed transition.
    pub fn last_state(&self) -> Option<S> {
        self.shared.inner.borrow().last_state.clone()
    }

    pub fn last_resolved_at(&self) -> Option<DateTime<Utc>> {
        self.shared.inner.borrow().last_resolved_at
    }

    /// Declared `(from, to)` patterns in table order.
    pub fn patterns(&self) -> Vec<(Pattern<S>, Pattern<S>)> {
        self.shared
            .inner
            .borrow()
            .table
            .iter()
            .map(|entry| (entry.transition.from.clone(), entry.transition.to.clone()))
            .collect()
    }

    /// Number of declared transitions.
    pub fn len(&self) -> usize {
        self.shared.inner.borrow().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.inner.borrow().table.is_empty()
    }
}

impl<S, A> fmt::Debug for StateMachine<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.shared.id)
            .field("name", &self.shared.name)
            .finish_non_exhaustive()
    }
}

fn describe<A: fmt::Debug>(args: Option<&A>) -> String {
    args.map(|args| format!("{args:?}")).unwrap_or_default()
}
