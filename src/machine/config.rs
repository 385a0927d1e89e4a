//! Machine configuration.

use serde::{Deserialize, Serialize};

/// When the default state's `on_enter` fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// The first registered state is entered as soon as it is registered.
    Immediate,
    /// The host registers every state and then calls `begin`.
    #[default]
    Deferred,
}

/// Independent switches for the three passes of a tick.
///
/// Turning a gate off skips its pass entirely; the other passes still run.
/// Used to pause or debug a machine without touching its states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunGates {
    /// Condition refresh on every registered state
    pub conditions: bool,
    /// Transition arbitration
    pub transitions: bool,
    /// Per-frame and fixed-step updates of the current state
    pub updates: bool,
}

impl Default for RunGates {
    fn default() -> Self {
        Self::all()
    }
}

impl RunGates {
    pub fn all() -> Self {
        Self {
            conditions: true,
            transitions: true,
            updates: true,
        }
    }

    pub fn none() -> Self {
        Self {
            conditions: false,
            transitions: false,
            updates: false,
        }
    }
}

/// Settings chosen by the owner of a machine.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use reflex::machine::{Activation, MachineConfig};
///
/// let config: MachineConfig =
///     serde_json::from_str(r#"{ "activation": "immediate", "gates": { "updates": false } }"#)
///         .unwrap();
///
/// assert_eq!(config.activation, Activation::Immediate);
/// assert!(config.gates.transitions);
/// assert!(!config.gates.updates);
/// assert_eq!(config.history_capacity, 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub activation: Activation,
    pub gates: RunGates,
    /// Number of handoffs kept in the transition log. Zero disables the log.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            activation: Activation::default(),
            gates: RunGates::default(),
            history_capacity: 32,
        }
    }
}
