//! Bounded log of handoffs performed by a machine.
//!
//! The log is a debugging aid. It keeps the most recent handoffs up to a
//! fixed capacity and drops the oldest ones first.

use super::kind::StateKind;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Why arbitration handed control to a new state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionReason {
    /// A candidate of equal or higher priority won while current stayed willing.
    Preempted,
    /// Current asked to exit and nothing else wanted control.
    Fallback,
    /// Current asked to exit and another candidate took over.
    Replaced,
    /// Current re-entered itself.
    Reentered,
}

/// Record of a single handoff.
///
/// # Example
///
/// ```rust
/// use reflex::core::{TransitionReason, TransitionRecord};
/// use reflex::state_kind;
///
/// state_kind! {
///     enum Mode {
///         Idle,
///         Chase,
///     }
/// }
///
/// let record = TransitionRecord {
///     from: Mode::Idle,
///     to: Mode::Chase,
///     tick: 12,
///     reason: TransitionReason::Preempted,
/// };
/// assert!(!record.is_reentry());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<K: StateKind> {
    /// The state that was exited
    pub from: K,
    /// The state that was entered
    pub to: K,
    /// Machine tick on which the handoff happened, counted from zero
    pub tick: u64,
    pub reason: TransitionReason,
}

impl<K: StateKind> TransitionRecord<K> {
    pub fn is_reentry(&self) -> bool {
        self.from == self.to
    }
}

/// Most recent handoffs, oldest first.
///
/// # Example
///
/// ```rust
/// use reflex::core::{TransitionLog, TransitionReason, TransitionRecord};
/// use reflex::state_kind;
///
/// state_kind! {
///     enum Mode {
///         Idle,
///         Roam,
///         Flee,
///     }
/// }
///
/// let mut log = TransitionLog::with_capacity(8);
/// log.push(TransitionRecord {
///     from: Mode::Idle,
///     to: Mode::Roam,
///     tick: 0,
///     reason: TransitionReason::Preempted,
/// });
/// log.push(TransitionRecord {
///     from: Mode::Roam,
///     to: Mode::Flee,
///     tick: 4,
///     reason: TransitionReason::Preempted,
/// });
///
/// assert_eq!(log.path(), vec![Mode::Idle, Mode::Roam, Mode::Flee]);
/// assert_eq!(log.span(), Some(4));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionLog<K: StateKind> {
    capacity: usize,
    records: VecDeque<TransitionRecord<K>>,
}

impl<K: StateKind> Default for TransitionLog<K> {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}

impl<K: StateKind> TransitionLog<K> {
    /// Create an empty log keeping at most `capacity` records.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(256)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest one when full.
    pub fn push(&mut self, record: TransitionRecord<K>) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Iterate over retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<K>> + '_ {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord<K>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// States traversed by the retained records.
    ///
    /// The first entry is the `from` of the oldest record, followed by the
    /// `to` of every record in order.
    pub fn path(&self) -> Vec<K> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Ticks elapsed between the oldest and newest retained record.
    pub fn span(&self) -> Option<u64> {
        match (self.records.front(), self.records.back()) {
            (Some(first), Some(last)) => Some(last.tick.saturating_sub(first.tick)),
            _ => None,
        }
    }
}
