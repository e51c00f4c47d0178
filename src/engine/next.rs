//! One-shot continuation handed to start handlers.

use crate::core::State;
use crate::engine::error::TransitionError;
use crate::engine::machine::{Pass, StateMachine, WeakMachine};
use crate::engine::transition::Transition;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Continuation of a matched transition.
///
/// A start handler that returns [`Transit::Pending`](crate::engine::Transit::Pending)
/// keeps this value and calls [`Next::resolve`] once its work is done, from
/// whatever later callback finishes that work. Until then the machine is
/// locked and drops every state-change request.
///
/// Dropping a `Next` without resolving it leaves the machine locked for good.
/// A `Next` only holds a weak reference to its machine, so parking one inside
/// a handler does not keep the machine alive; resolving it after the last
/// handle is dropped does nothing.
pub struct Next<S, A> {
    machine: WeakMachine<S, A>,
    pass: Rc<Pass<S, A>>,
    index: usize,
    transition: Rc<Transition<S, A>>,
    fired: Rc<Cell<bool>>,
}

impl<S: State + 'static, A: Clone + fmt::Debug + 'static> Next<S, A> {
    pub(crate) fn new(
        machine: &StateMachine<S, A>,
        pass: Rc<Pass<S, A>>,
        index: usize,
        transition: Rc<Transition<S, A>>,
        fired: Rc<Cell<bool>>,
    ) -> Self {
        Self {
            machine: machine.downgrade(),
            pass,
            index,
            transition,
            fired,
        }
    }

    /// Finish the transition with `args`.
    ///
    /// Unlocks the machine, runs the exit handler and the ready callback, then
    /// keeps scanning for further matches of the same request unless a newer
    /// request has started in the meantime. Handler errors are returned to
    /// the caller of `resolve`.
    pub fn resolve(self, args: Option<A>) -> Result<(), TransitionError> {
        if self.fired.replace(true) {
            return Ok(());
        }

        let machine = match self.machine.upgrade() {
            Some(machine) => machine,
            None => return Ok(()),
        };

        let resume = machine.complete(&self.pass, self.index, &self.transition, args.as_ref())?;
        if resume {
            machine.scan(&self.pass, args)?;
        }
        Ok(())
    }
}

impl<S, A> fmt::Debug for Next<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("fired", &self.fired.get())
            .finish()
    }
}
