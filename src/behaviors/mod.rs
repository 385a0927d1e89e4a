//! Reusable behaviors built on the state contract.
//!
//! - `IdleState`: an inert fallback, suitable as the default state
//! - `RoamState`: random wandering driven by a tick-clocked timer

mod idle;
mod roam;

pub use idle::IdleState;
pub use roam::{RoamConfig, RoamEvent, RoamHandle, RoamState, RoamTimer};
