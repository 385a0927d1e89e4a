//! Property-based tests for machine arbitration.
//!
//! These tests use proptest to drive randomly registered machines through
//! random enter/exit wishes and check the invariants after every tick.

mod common;

use common::{from_mask, Board, Kind, Probe, ALL};
use proptest::prelude::*;
use reflex::{Phase, StateMachine};
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Place {
    Step(u32),
    At(i32),
}

fn place() -> impl Strategy<Value = Place> {
    prop_oneof![
        (0u32..3).prop_map(Place::Step),
        (-2i32..8).prop_map(Place::At),
    ]
}

prop_compose! {
    fn layout()(
        places in prop::collection::vec(place(), 0..ALL.len()),
        reentrant in any::<u8>(),
    ) -> (Vec<Place>, u8) {
        (places, reentrant)
    }
}

fn ticks() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((any::<u8>(), any::<u8>()), 1..24)
}

/// Register `A` as default, then one state per placement.
fn machine(places: &[Place], reentrant: u8) -> StateMachine<Kind, Board> {
    let mut machine = StateMachine::new(Board::default());
    machine.register(Probe::new(Kind::A)).unwrap();

    let reentrant = from_mask(reentrant);
    for (place, kind) in places.iter().zip(ALL.iter().skip(1)) {
        let probe = if reentrant.contains(kind) {
            Probe::reentrant(*kind)
        } else {
            Probe::new(*kind)
        };
        match place {
            Place::Step(increment) => machine.register_with_increment(probe, *increment),
            Place::At(priority) => machine.register_at(probe, *priority),
        }
        .unwrap();
    }
    machine.begin().unwrap();
    machine
}

/// Winner by max (priority, registration index) among eligible candidates.
fn expected_winner(
    machine: &StateMachine<Kind, Board>,
    reentrant: u8,
    enter: u8,
    exit: u8,
) -> Kind {
    let current = machine.current_kind().unwrap();
    let default = machine.default_kind().unwrap();
    let enter = from_mask(enter);
    let reentrant = from_mask(reentrant);
    let priority = |kind: Kind| machine.priority_of(kind).unwrap();
    let index = |kind: Kind| ALL.iter().position(|k| *k == kind).unwrap();

    let base = if from_mask(exit).contains(&current) {
        default
    } else {
        current
    };
    machine
        .kinds()
        .into_iter()
        .filter(|kind| priority(*kind) >= priority(base))
        .filter(|kind| enter.contains(kind))
        .filter(|kind| *kind != current || (reentrant.contains(kind) && *kind != default))
        .max_by_key(|kind| (priority(*kind), index(*kind)))
        .unwrap_or(base)
}

proptest! {
    #[test]
    fn default_stays_at_zero((places, reentrant) in layout(), steps in ticks()) {
        let mut machine = machine(&places, reentrant);

        for (enter, exit) in steps {
            machine.props_mut().set_masks(enter, exit);
            machine.update().unwrap();
            prop_assert_eq!(machine.default_kind(), Some(Kind::A));
            prop_assert_eq!(machine.priority_of(Kind::A), Some(0));
        }
    }

    #[test]
    fn current_is_always_registered((places, reentrant) in layout(), steps in ticks()) {
        let mut machine = machine(&places, reentrant);

        for (enter, exit) in steps {
            machine.props_mut().set_masks(enter, exit);
            machine.update().unwrap();
            let current = machine.current_kind();
            prop_assert!(current.is_some());
            prop_assert!(machine.contains(current.unwrap()));
            prop_assert!(machine.audit().is_success());
        }
    }

    #[test]
    fn winner_is_highest_latest_eligible((places, reentrant) in layout(), steps in ticks()) {
        let mut machine = machine(&places, reentrant);

        for (enter, exit) in steps {
            machine.props_mut().set_masks(enter, exit);
            let expected = expected_winner(&machine, reentrant, enter, exit);
            machine.update().unwrap();
            prop_assert_eq!(machine.current_kind(), Some(expected));
        }
    }

    #[test]
    fn quiet_exit_falls_back_to_default((places, reentrant) in layout(), steps in ticks()) {
        let mut machine = machine(&places, reentrant);

        for (enter, exit) in steps {
            let current = machine.current_kind().unwrap();
            machine.props_mut().set_masks(0, exit);
            machine.update().unwrap();
            if from_mask(exit).contains(&current) {
                prop_assert!(machine.is_default());
            } else {
                prop_assert_eq!(machine.current_kind(), Some(current));
            }
            machine.props_mut().set_masks(enter, 0);
            machine.update().unwrap();
        }
    }

    #[test]
    fn closed_transition_gate_freezes_current(
        (places, reentrant) in layout(),
        warmup in ticks(),
        frozen in ticks(),
    ) {
        let mut machine = machine(&places, reentrant);
        for (enter, exit) in warmup {
            machine.props_mut().set_masks(enter, exit);
            machine.update().unwrap();
        }

        let held = machine.current_kind();
        let handoffs = machine.props().handoffs().len();
        machine.gates_mut().transitions = false;
        for (enter, exit) in frozen {
            machine.props_mut().set_masks(enter, exit);
            prop_assert!(!machine.update().unwrap().is_transitioned());
            prop_assert_eq!(machine.current_kind(), held);
        }
        prop_assert_eq!(machine.props().handoffs().len(), handoffs);
    }

    #[test]
    fn enter_and_exit_hooks_alternate((places, reentrant) in layout(), steps in ticks()) {
        let mut machine = machine(&places, reentrant);
        for (enter, exit) in steps {
            machine.props_mut().set_masks(enter, exit);
            machine.update().unwrap();
        }

        let mut open: HashMap<Kind, bool> = HashMap::new();
        for (kind, phase) in machine.props().handoffs() {
            let was_open = open.insert(kind, phase == Phase::OnEnter).unwrap_or(false);
            prop_assert_eq!(was_open, phase == Phase::OnExit);
        }

        let still_open: Vec<Kind> = open
            .into_iter()
            .filter(|(_, is_open)| *is_open)
            .map(|(kind, _)| kind)
            .collect();
        prop_assert_eq!(still_open, vec![machine.current_kind().unwrap()]);
    }

    #[test]
    fn counter_priorities_never_decrease(steps in prop::collection::vec(0u32..4, 0..ALL.len())) {
        let places: Vec<Place> = steps.into_iter().map(Place::Step).collect();
        let machine = machine(&places, 0);

        let assigned: Vec<i32> = ALL
            .iter()
            .take(places.len() + 1)
            .map(|kind| machine.priority_of(*kind).unwrap())
            .collect();
        prop_assert!(assigned.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert_eq!(machine.last_priority(), *assigned.last().unwrap());
    }

    #[test]
    fn history_matches_handoff_hooks((places, reentrant) in layout(), steps in ticks()) {
        let mut machine = machine(&places, reentrant);
        for (enter, exit) in steps {
            machine.props_mut().set_masks(enter, exit);
            machine.update().unwrap();
        }

        let entered = machine.props().calls(Phase::OnEnter);
        let path: Vec<Kind> = machine.history().records().map(|r| r.to).collect();
        if machine.history().len() < machine.config().history_capacity {
            prop_assert_eq!(&entered[1..], &path[..]);
        }
    }
}
