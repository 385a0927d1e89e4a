//! Fallback state that never asks for control.

use crate::core::{HookResult, State, StateKind};

/// Does nothing and never wants to enter or exit.
///
/// Register it first to get a default state that only regains control when
/// every other state has let go.
pub struct IdleState<K: StateKind> {
    kind: K,
}

impl<K: StateKind> IdleState<K> {
    pub fn new(kind: K) -> Self {
        Self { kind }
    }
}

impl<K: StateKind, P> State<K, P> for IdleState<K> {
    fn kind(&self) -> K {
        self.kind
    }

    fn enter(&self, _props: &P) -> HookResult<bool> {
        Ok(false)
    }
}
