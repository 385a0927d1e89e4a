//! Machine errors.

use crate::core::{Phase, StateError};
use thiserror::Error;

/// Errors returned by registration, activation and tick operations.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("State {kind} is already registered")]
    DuplicateState { kind: &'static str },

    #[error("State {kind} is not registered")]
    UnknownState { kind: &'static str },

    #[error("Default state {kind} must keep priority 0 (requested {requested})")]
    DefaultPriorityFixed { kind: &'static str, requested: i32 },

    #[error("Machine invariant violated: {detail}")]
    InvariantViolation { detail: String },

    #[error("Machine not started. Call .begin() after registering states")]
    NotStarted,

    #[error("Machine already started")]
    AlreadyStarted,

    #[error("State {kind} failed during {phase}: {source}")]
    Hook {
        kind: &'static str,
        phase: Phase,
        #[source]
        source: StateError,
    },
}

impl FsmError {
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }

    /// Kind and phase of a failed state hook, if this is a hook fault.
    pub fn hook_site(&self) -> Option<(&'static str, Phase)> {
        match self {
            Self::Hook { kind, phase, .. } => Some((*kind, *phase)),
            _ => None,
        }
    }
}
