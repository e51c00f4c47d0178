//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use juncture::core::{History, Pattern};
use juncture::{Config, Hook, OnStart, StateMachine};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, PartialEq, Debug)]
enum TestState {
    Initial,
    Processing,
    Complete,
    Failed,
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> TestState {
        match variant {
            0 => TestState::Initial,
            1 => TestState::Processing,
            2 => TestState::Complete,
            _ => TestState::Failed,
        }
    }
}

fn arbitrary_pattern() -> impl Strategy<Value = Pattern<TestState>> {
    prop_oneof![
        Just(Pattern::Any),
        Just(Pattern::Initial),
        arbitrary_state().prop_map(Pattern::Is),
    ]
}

proptest! {
    #[test]
    fn history_keeps_last_requests_in_order(
        requests in prop::collection::vec(arbitrary_state(), 0..30),
        limit in 1..10usize,
    ) {
        let config = Config { state_limit: limit, ..Config::default() };
        let machine: StateMachine<TestState, ()> = StateMachine::with_config(config).unwrap();

        for state in &requests {
            machine.request(state.clone()).unwrap();
        }

        let keep = requests.len().min(limit);
        let expected = requests[requests.len() - keep..].to_vec();
        prop_assert_eq!(machine.history(), expected);
    }

    #[test]
    fn standalone_history_matches_machine_window(
        requests in prop::collection::vec(0..100i32, 0..30),
        limit in 1..10usize,
    ) {
        let mut history = History::new(limit);
        for state in &requests {
            history.record(*state);
        }

        prop_assert!(history.len() <= limit);
        prop_assert_eq!(history.latest(), requests.last());
    }

    #[test]
    fn remove_only_drops_its_own_record(
        count in 1..10usize,
        target in 0..10usize,
    ) {
        let target = target % count;
        let machine: StateMachine<TestState, ()> = StateMachine::new();
        let ids: Vec<_> = (0..count)
            .map(|_| machine.declare(TestState::Initial, TestState::Processing, OnStart::NoOp, None))
            .collect();

        machine.remove(ids[target]);
        prop_assert_eq!(machine.len(), count - 1);

        machine.remove(ids[target]);
        prop_assert_eq!(machine.len(), count - 1);
    }

    #[test]
    fn exits_run_for_exactly_the_matching_records(
        patterns in prop::collection::vec((arbitrary_pattern(), arbitrary_pattern()), 0..8),
        from in arbitrary_state(),
        to in arbitrary_state(),
    ) {
        let machine: StateMachine<TestState, ()> = StateMachine::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        for (index, (from_pattern, to_pattern)) in patterns.iter().enumerate() {
            let fired = Rc::clone(&fired);
            machine.declare(
                from_pattern.clone(),
                to_pattern.clone(),
                OnStart::NoOp,
                Some(Hook::new(move |_, _, _, _| {
                    fired.borrow_mut().push(index);
                    Ok(())
                })),
            );
        }

        machine.request(from.clone()).unwrap();
        fired.borrow_mut().clear();
        machine.request(to.clone()).unwrap();

        let expected: Vec<usize> = patterns
            .iter()
            .enumerate()
            .filter(|(_, (f, t))| f.matches_from(Some(&from)) && t.matches_to(&to))
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(fired.borrow().clone(), expected);
    }

    #[test]
    fn strict_mode_never_records_rejected_requests(
        requests in prop::collection::vec(arbitrary_state(), 1..20),
    ) {
        let machine: StateMachine<TestState, ()> = StateMachine::new();
        machine.set_strict(true);
        machine.declare(Pattern::Initial, TestState::Initial, OnStart::NoOp, None);
        machine.declare(TestState::Initial, TestState::Processing, OnStart::NoOp, None);
        machine.declare(TestState::Processing, Pattern::Any, OnStart::NoOp, None);

        let mut accepted = Vec::new();
        for state in requests {
            if machine.request(state.clone()).is_ok() {
                accepted.push(state);
            }
        }

        let keep = accepted.len().min(machine.state_limit());
        prop_assert_eq!(machine.history(), accepted[accepted.len() - keep..].to_vec());
    }
}
