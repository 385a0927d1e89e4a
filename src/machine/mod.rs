//! The priority-arbitrated state machine.
//!
//! The host drives a machine from its own loop:
//! - `register`/`register_at` each state once during setup
//! - `begin` once, unless activation is `Immediate`
//! - `update` every frame and `fixed_update` every fixed step
//!
//! Nothing here blocks, spawns or suspends. Delayed behavior belongs to the
//! states themselves and reaches the machine only through props or state
//! flags between ticks.

mod config;
mod engine;
mod error;

pub use config::{Activation, MachineConfig, RunGates};
pub(crate) use engine::Placement;
pub use engine::{Arbitration, PriorityOrigin, StateMachine};
pub use error::FsmError;
