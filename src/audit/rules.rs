//! Invariant checks run against a machine snapshot.

use crate::audit::violations::Violation;
use crate::core::StateKind;
use crate::machine::PriorityOrigin;
use crate::snapshot::MachineSnapshot;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<Violation>>;

fn pass() -> Check {
    Validation::success(())
}

fn flag(violation: Violation) -> Check {
    Validation::fail(violation)
}

/// Check every machine invariant, accumulating ALL violations.
///
/// Returns `Validation::Success(())` for a healthy machine and
/// `Validation::Failure` listing every broken invariant otherwise.
/// An empty machine is trivially healthy.
pub fn audit<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Validation<(), NonEmptyVec<Violation>> {
    if snapshot.states.is_empty() {
        return pass();
    }

    let mut checks = vec![default_state(snapshot), current_state(snapshot)];
    checks.extend(unique_kinds(snapshot));
    checks.extend(activity(snapshot));
    checks.extend(scan_order(snapshot));
    checks.extend(counter(snapshot));

    Validation::all_vec(checks).map(|_| ())
}

fn default_state<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Check {
    let Some(entry) = snapshot.default.and_then(|kind| snapshot.entry(kind)) else {
        return flag(Violation::MissingDefault);
    };
    if entry.priority != 0 {
        return flag(Violation::DefaultPriority {
            kind: entry.kind.name(),
            priority: entry.priority,
        });
    }
    pass()
}

fn current_state<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Check {
    match snapshot.current {
        None => flag(Violation::MissingCurrent),
        Some(kind) if snapshot.entry(kind).is_none() => {
            flag(Violation::UnregisteredCurrent { kind: kind.name() })
        }
        Some(_) => pass(),
    }
}

fn unique_kinds<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Vec<Check> {
    let mut seen = HashSet::new();
    snapshot
        .states
        .iter()
        .filter(|entry| !seen.insert(entry.kind))
        .map(|entry| flag(Violation::DuplicateKind { kind: entry.kind.name() }))
        .collect()
}

/// Once started, exactly the current state is active. Before, none is.
fn activity<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Vec<Check> {
    let current = snapshot.current.filter(|_| snapshot.started);
    let mut checks = Vec::new();

    for entry in &snapshot.states {
        let is_current = Some(entry.kind) == current;
        if is_current && !entry.active {
            checks.push(flag(Violation::InactiveCurrent {
                kind: entry.kind.name(),
            }));
        } else if !is_current && entry.active {
            checks.push(flag(Violation::StrayActive {
                kind: entry.kind.name(),
            }));
        }
    }
    checks
}

/// Entries must be strictly ascending by (priority, index) and every
/// index must name a registration slot.
fn scan_order<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Vec<Check> {
    let count = snapshot.states.len();
    let mut checks = Vec::new();

    for (position, entry) in snapshot.states.iter().enumerate() {
        if entry.index >= count {
            checks.push(flag(Violation::ScanOrder { position }));
            continue;
        }
        if position > 0 {
            let previous = &snapshot.states[position - 1];
            if (previous.priority, previous.index) >= (entry.priority, entry.index) {
                checks.push(flag(Violation::ScanOrder { position }));
            }
        }
    }
    checks
}

fn counter<K: StateKind>(snapshot: &MachineSnapshot<K>) -> Vec<Check> {
    snapshot
        .states
        .iter()
        .filter(|entry| entry.origin == PriorityOrigin::Counter)
        .filter(|entry| entry.priority > snapshot.last_priority)
        .map(|entry| {
            flag(Violation::CounterBehind {
                kind: entry.kind.name(),
                priority: entry.priority,
                counter: snapshot.last_priority,
            })
        })
        .collect()
}
