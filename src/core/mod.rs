//! Core types shared by every machine.
//!
//! This module contains the contract between the machine and its states:
//! - State kinds via the `StateKind` trait
//! - The `State` capability trait and its hook error type
//! - The bounded transition log

mod history;
mod kind;
mod state;

pub use history::{TransitionLog, TransitionReason, TransitionRecord};
pub use kind::StateKind;
pub use state::{HookResult, Phase, State, StateError};
