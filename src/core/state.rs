//! The capability contract every state must implement.
//!
//! A state is a unit of behavior. The machine asks it two questions each
//! tick (does it want control, does it want to give control up) and calls
//! its lifecycle hooks when arbitration hands control to it or away from it.

use super::kind::StateKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error raised by a state's own hook.
///
/// The machine never swallows these: they are wrapped with the state's kind
/// and the [`Phase`] that failed and returned from the tick.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl StateError {
    /// Build an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Result type returned by every state hook.
pub type HookResult<T = ()> = Result<T, StateError>;

/// Lifecycle phase in which a state hook ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Enter,
    Exit,
    OnEnter,
    OnExit,
    Update,
    FixedUpdate,
    UpdateCondition,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
            Self::OnEnter => "on_enter",
            Self::OnExit => "on_exit",
            Self::Update => "update",
            Self::FixedUpdate => "fixed_update",
            Self::UpdateCondition => "update_condition",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of behavior hosted by a [`StateMachine`].
///
/// `K` is the kind enum of the owning machine and `P` the shared entity
/// context ("props") threaded through every hook. The machine never
/// interprets `P`; states use it to observe the world and express intent.
///
/// Priority is not part of this trait. It is assigned by the machine at
/// registration and changed only through
/// [`StateMachine::set_priority`](crate::machine::StateMachine::set_priority).
///
/// # Hook contract
///
/// - [`enter`](State::enter) and [`exit`](State::exit) are predicates and
///   must not have side effects. Arbitration may call them on any tick.
/// - [`on_enter`](State::on_enter) and [`on_exit`](State::on_exit) are
///   always paired: every activation is followed by exactly one deactivation
///   before the next activation. The state still current when the machine is
///   dropped gets no final `on_exit`.
/// - [`update`](State::update) and [`fixed_update`](State::fixed_update) run
///   only while the state is current.
/// - [`update_condition`](State::update_condition) runs on every registered
///   state every tick, so a dormant state can decide to activate.
///
/// # Example
///
/// ```rust
/// use reflex::core::{HookResult, State};
/// use reflex::state_kind;
///
/// state_kind! {
///     pub enum Mode {
///         Idle,
///         Alert,
///     }
/// }
///
/// struct Props {
///     enemy_visible: bool,
/// }
///
/// struct Alert;
///
/// impl State<Mode, Props> for Alert {
///     fn kind(&self) -> Mode {
///         Mode::Alert
///     }
///
///     fn enter(&self, props: &Props) -> HookResult<bool> {
///         Ok(props.enemy_visible)
///     }
///
///     fn exit(&self, props: &Props) -> HookResult<bool> {
///         Ok(!props.enemy_visible)
///     }
/// }
/// ```
///
/// [`StateMachine`]: crate::machine::StateMachine
pub trait State<K: StateKind, P> {
    /// Kind this state is registered under.
    fn kind(&self) -> K;

    /// Whether the state may re-enter itself while already current.
    ///
    /// When `true` and [`enter`](State::enter) keeps returning `true`, the
    /// state is exited and entered again on every tick.
    fn can_transition_self(&self) -> bool {
        false
    }

    /// Whether the state wants to become current.
    fn enter(&self, props: &P) -> HookResult<bool>;

    /// Whether the state, while current, wants to relinquish control.
    fn exit(&self, _props: &P) -> HookResult<bool> {
        Ok(false)
    }

    fn on_enter(&mut self, _props: &mut P) -> HookResult {
        Ok(())
    }

    fn on_exit(&mut self, _props: &mut P) -> HookResult {
        Ok(())
    }

    /// Per-frame work while current.
    fn update(&mut self, _props: &mut P) -> HookResult {
        Ok(())
    }

    /// Fixed-step work while current.
    fn fixed_update(&mut self, _props: &mut P) -> HookResult {
        Ok(())
    }

    /// Refresh cached preconditions. Runs on every state, current or not.
    fn update_condition(&mut self, _props: &mut P) -> HookResult {
        Ok(())
    }
}
