//! Diagnostic snapshots of a running machine.
//!
//! A snapshot records the machine's bookkeeping (current and default kinds,
//! priorities, gates, activation flags and recent handoffs) in a form that
//! serializes to JSON or a compact binary encoding. State objects themselves
//! are not captured, so a snapshot cannot rebuild a machine. It exists for
//! debugging tools and for the invariant [`audit`](crate::audit).

use crate::core::{StateKind, TransitionLog};
use crate::machine::{PriorityOrigin, RunGates};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Bookkeeping for one registered state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateEntry<K: StateKind> {
    pub kind: K,
    /// Registration order, zero for the default state
    pub index: usize,
    pub priority: i32,
    pub origin: PriorityOrigin,
    /// Whether `on_enter` has fired without a matching `on_exit`
    pub active: bool,
    pub can_transition_self: bool,
}

/// Serializable view of a machine at one point in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineSnapshot<K: StateKind> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Completed updates at capture time
    pub tick: u64,

    pub started: bool,

    /// Current state; `None` only for an empty machine
    pub current: Option<K>,

    pub default: Option<K>,

    pub gates: RunGates,

    /// Running priority counter
    pub last_priority: i32,

    /// Registered states in arbitration order
    pub states: Vec<StateEntry<K>>,

    /// Recent handoffs
    pub history: TransitionLog<K>,
}

impl<K: StateKind> MachineSnapshot<K> {
    /// Entry for a registered kind.
    pub fn entry(&self, kind: K) -> Option<&StateEntry<K>> {
        self.states.iter().find(|entry| entry.kind == kind)
    }

    /// Kinds whose `on_enter` has fired without a matching `on_exit`.
    pub fn active_kinds(&self) -> Vec<K> {
        self.states
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.kind)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}
