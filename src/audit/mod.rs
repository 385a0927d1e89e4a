//! Invariant audit for state machines.
//!
//! The audit re-checks the data-model invariants of a machine from a
//! [`MachineSnapshot`](crate::snapshot::MachineSnapshot), using Stillwater's
//! `Validation` so that a broken machine reports every violation at once
//! instead of the first one found.
//!
//! # Example
//!
//! ```rust
//! use reflex::core::{HookResult, State};
//! use reflex::machine::StateMachine;
//! use reflex::state_kind;
//!
//! state_kind! {
//!     enum Mode {
//!         Idle,
//!     }
//! }
//!
//! struct Idle;
//!
//! impl State<Mode, ()> for Idle {
//!     fn kind(&self) -> Mode {
//!         Mode::Idle
//!     }
//!
//!     fn enter(&self, _props: &()) -> HookResult<bool> {
//!         Ok(false)
//!     }
//! }
//!
//! let mut machine = StateMachine::new(());
//! machine.register(Idle).unwrap();
//! machine.begin().unwrap();
//!
//! assert!(machine.audit().is_success());
//! assert!(reflex::audit::audit(&machine.snapshot()).is_success());
//! ```

pub mod rules;
pub mod violations;

pub use rules::audit;
pub use violations::Violation;
