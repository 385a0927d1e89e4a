//! State kind identifiers.
//!
//! Every state registered with a machine is keyed by a kind. Kinds are small
//! closed enums chosen by the host, so a machine never needs runtime type
//! inspection to find a state.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Identifier for a class of state within one machine.
///
/// A kind may be registered at most once per machine. The [`state_kind!`]
/// macro generates an enum implementing this trait.
///
/// # Example
///
/// ```rust
/// use reflex::core::StateKind;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Mode {
///     Idle,
///     Patrol,
/// }
///
/// impl StateKind for Mode {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Patrol => "Patrol",
///         }
///     }
/// }
///
/// assert_eq!(Mode::Patrol.name(), "Patrol");
/// ```
///
/// [`state_kind!`]: crate::state_kind
pub trait StateKind:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Stable display name, used in errors and log output.
    fn name(&self) -> &'static str;
}
