//! Invariant violations reported by the audit.

use thiserror::Error;

/// A broken machine invariant
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("Machine has states but no default")]
    MissingDefault,

    #[error("Default state {kind} has priority {priority}, expected 0")]
    DefaultPriority { kind: &'static str, priority: i32 },

    #[error("Current state {kind} is not registered")]
    UnregisteredCurrent { kind: &'static str },

    #[error("Machine has states but no current state")]
    MissingCurrent,

    #[error("Current state {kind} was never entered")]
    InactiveCurrent { kind: &'static str },

    #[error("State {kind} is active but not current")]
    StrayActive { kind: &'static str },

    #[error("State {kind} is registered more than once")]
    DuplicateKind { kind: &'static str },

    #[error("Arbitration order broken at position {position}")]
    ScanOrder { position: usize },

    #[error("Priority counter {counter} is below {kind}'s counter-assigned priority {priority}")]
    CounterBehind {
        kind: &'static str,
        priority: i32,
        counter: i32,
    },
}
