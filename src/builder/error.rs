//! Build errors for the state machine builder.

use crate::machine::FsmError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No states added. Call .state(..) at least once before .build()")]
    NoStates,

    #[error("Registration failed: {0}")]
    Machine(#[from] FsmError),
}
