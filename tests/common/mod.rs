//! Shared test states.
//!
//! Predicates read the blackboard props, hooks append to its journal, so a
//! test steers arbitration by editing props between ticks.

#![allow(dead_code)]

use reflex::{state_kind, HookResult, Phase, State};
use std::collections::HashSet;

state_kind! {
    pub enum Kind {
        A,
        B,
        C,
        D,
        E,
        F,
    }
}

pub const ALL: [Kind; 6] = [Kind::A, Kind::B, Kind::C, Kind::D, Kind::E, Kind::F];

#[derive(Default)]
pub struct Board {
    pub enter: HashSet<Kind>,
    pub exit: HashSet<Kind>,
    pub journal: Vec<(Kind, Phase)>,
}

impl Board {
    /// Set the enter and exit wishes from bitmasks over `ALL`.
    pub fn set_masks(&mut self, enter: u8, exit: u8) {
        self.enter = from_mask(enter);
        self.exit = from_mask(exit);
    }

    pub fn calls(&self, phase: Phase) -> Vec<Kind> {
        self.journal
            .iter()
            .filter(|(_, p)| *p == phase)
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn handoffs(&self) -> Vec<(Kind, Phase)> {
        self.journal
            .iter()
            .filter(|(_, p)| matches!(p, Phase::OnEnter | Phase::OnExit))
            .copied()
            .collect()
    }
}

pub fn from_mask(mask: u8) -> HashSet<Kind> {
    ALL.iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, kind)| *kind)
        .collect()
}

pub struct Probe {
    kind: Kind,
    reenter: bool,
}

impl Probe {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            reenter: false,
        }
    }

    pub fn reentrant(kind: Kind) -> Self {
        Self {
            kind,
            reenter: true,
        }
    }
}

impl State<Kind, Board> for Probe {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn can_transition_self(&self) -> bool {
        self.reenter
    }

    fn enter(&self, board: &Board) -> HookResult<bool> {
        Ok(board.enter.contains(&self.kind))
    }

    fn exit(&self, board: &Board) -> HookResult<bool> {
        Ok(board.exit.contains(&self.kind))
    }

    fn on_enter(&mut self, board: &mut Board) -> HookResult {
        board.journal.push((self.kind, Phase::OnEnter));
        Ok(())
    }

    fn on_exit(&mut self, board: &mut Board) -> HookResult {
        board.journal.push((self.kind, Phase::OnExit));
        Ok(())
    }

    fn update(&mut self, board: &mut Board) -> HookResult {
        board.journal.push((self.kind, Phase::Update));
        Ok(())
    }

    fn update_condition(&mut self, board: &mut Board) -> HookResult {
        board.journal.push((self.kind, Phase::UpdateCondition));
        Ok(())
    }
}
