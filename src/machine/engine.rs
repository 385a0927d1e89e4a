//! Priority-arbitrated state machine driven by a host tick loop.

use crate::audit::{self, Violation};
use crate::core::{
    HookResult, Phase, State, StateError, StateKind, TransitionLog, TransitionReason,
    TransitionRecord,
};
use crate::machine::config::{Activation, MachineConfig, RunGates};
use crate::machine::error::FsmError;
use crate::snapshot::{MachineSnapshot, StateEntry, SNAPSHOT_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// The first registered state is the default and lives in slot zero.
const DEFAULT_SLOT: usize = 0;

/// How a state's priority was assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityOrigin {
    /// The default state, pinned at zero
    Default,
    /// Running counter plus an increment
    Counter,
    /// Explicit value given at registration
    Fixed,
    /// Changed after registration
    Reassigned,
}

/// Where a state lands in the priority order at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Increment(u32),
    Fixed(i32),
}

/// Result of the arbitration pass of one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Arbitration<K: StateKind> {
    /// Arbitration ran and the current state kept control
    Stayed,
    /// Control was handed off (possibly from a state to itself)
    Transitioned(TransitionRecord<K>),
    /// The transition gate is off
    Skipped,
}

impl<K: StateKind> Arbitration<K> {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }

    pub fn record(&self) -> Option<&TransitionRecord<K>> {
        match self {
            Self::Transitioned(record) => Some(record),
            _ => None,
        }
    }
}

struct Slot<K: StateKind, P> {
    kind: K,
    state: Box<dyn State<K, P>>,
    priority: i32,
    origin: PriorityOrigin,
    active: bool,
}

/// Flat, single-active-state machine with priority arbitration.
///
/// The machine owns its states and the shared props `P`. Each call to
/// [`update`](Self::update) runs three passes, each behind its own gate:
///
/// 1. condition refresh on every registered state,
/// 2. arbitration, which may hand control to another state,
/// 3. the per-frame update of the current state.
///
/// # Arbitration
///
/// The current state is asked whether it wants to exit. If it does, the
/// running target starts at the default state, otherwise at current. Every
/// state is then scanned in ascending priority order, ties by registration
/// order. A candidate replaces the running target when its priority is at
/// least the target's, it is not current (or is current and may re-enter
/// itself), and its `enter` predicate holds. Later candidates therefore win
/// ties. If the final target is a different state, or current re-entering
/// itself, current's `on_exit` runs, then the target's `on_enter`.
///
/// When current exits and no candidate wants control, the default state takes
/// over. The default state always has priority 0 and is never removed.
///
/// # Example
///
/// ```rust
/// use reflex::core::{HookResult, State};
/// use reflex::machine::StateMachine;
/// use reflex::state_kind;
///
/// state_kind! {
///     pub enum Mode {
///         Idle,
///         Chase,
///     }
/// }
///
/// #[derive(Default)]
/// struct Props {
///     target_visible: bool,
/// }
///
/// struct Idle;
///
/// impl State<Mode, Props> for Idle {
///     fn kind(&self) -> Mode {
///         Mode::Idle
///     }
///
///     fn enter(&self, _props: &Props) -> HookResult<bool> {
///         Ok(false)
///     }
/// }
///
/// struct Chase;
///
/// impl State<Mode, Props> for Chase {
///     fn kind(&self) -> Mode {
///         Mode::Chase
///     }
///
///     fn enter(&self, props: &Props) -> HookResult<bool> {
///         Ok(props.target_visible)
///     }
///
///     fn exit(&self, props: &Props) -> HookResult<bool> {
///         Ok(!props.target_visible)
///     }
/// }
///
/// let mut machine = StateMachine::new(Props::default());
/// machine.register(Idle).unwrap();
/// machine.register(Chase).unwrap();
/// machine.begin().unwrap();
///
/// machine.props_mut().target_visible = true;
/// assert!(machine.update().unwrap().is_transitioned());
/// assert_eq!(machine.current_kind(), Some(Mode::Chase));
///
/// machine.props_mut().target_visible = false;
/// machine.update().unwrap();
/// assert!(machine.is_default());
/// ```
pub struct StateMachine<K: StateKind, P> {
    slots: Vec<Slot<K, P>>,
    by_kind: HashMap<K, usize>,
    order: Vec<usize>,
    current: usize,
    last_priority: i32,
    started: bool,
    tick: u64,
    config: MachineConfig,
    history: TransitionLog<K>,
    props: P,
}

impl<K: StateKind, P> StateMachine<K, P> {
    /// Create an empty machine with the default configuration.
    pub fn new(props: P) -> Self {
        Self::with_config(props, MachineConfig::default())
    }

    pub fn with_config(props: P, config: MachineConfig) -> Self {
        Self {
            slots: Vec::new(),
            by_kind: HashMap::new(),
            order: Vec::new(),
            current: DEFAULT_SLOT,
            last_priority: 0,
            started: false,
            tick: 0,
            history: TransitionLog::with_capacity(config.history_capacity),
            config,
            props,
        }
    }

    /// Register a state one priority step above the last one.
    ///
    /// The first state registered becomes both current and default, with
    /// priority 0. Returns the assigned priority.
    ///
    /// Under [`Activation::Immediate`] the first registration also runs the
    /// default's `on_enter`. If that hook fails the error is returned, but the
    /// state stays registered and the machine counts as started with the
    /// default entered. Registering the same kind again then fails with
    /// [`FsmError::DuplicateState`].
    pub fn register<S>(&mut self, state: S) -> Result<i32, FsmError>
    where
        S: State<K, P> + 'static,
    {
        self.insert(Box::new(state), Placement::Increment(1))
    }

    /// Register a state `increment` steps above the last one.
    ///
    /// An increment of zero places the state level with the previous one.
    pub fn register_with_increment<S>(&mut self, state: S, increment: u32) -> Result<i32, FsmError>
    where
        S: State<K, P> + 'static,
    {
        self.insert(Box::new(state), Placement::Increment(increment))
    }

    /// Register a state at an explicit priority.
    ///
    /// The running counter becomes the highest priority registered so far.
    /// A fixed priority given to the first state is ignored.
    pub fn register_at<S>(&mut self, state: S, priority: i32) -> Result<i32, FsmError>
    where
        S: State<K, P> + 'static,
    {
        self.insert(Box::new(state), Placement::Fixed(priority))
    }

    /// Shared by every registration path. A failing immediate `on_enter` is
    /// reported after the slot is committed.
    pub(crate) fn insert(
        &mut self,
        state: Box<dyn State<K, P>>,
        placement: Placement,
    ) -> Result<i32, FsmError> {
        let kind = state.kind();
        if self.by_kind.contains_key(&kind) {
            return Err(FsmError::DuplicateState { kind: kind.name() });
        }

        let index = self.slots.len();
        let (priority, origin) = if index == DEFAULT_SLOT {
            if let Placement::Fixed(requested) = placement {
                if requested != 0 {
                    debug!(state = kind.name(), requested, "default state pinned at priority 0");
                }
            }
            self.last_priority = 0;
            (0, PriorityOrigin::Default)
        } else {
            match placement {
                Placement::Increment(step) => {
                    let step = i32::try_from(step).unwrap_or(i32::MAX);
                    self.last_priority = self.last_priority.saturating_add(step);
                    (self.last_priority, PriorityOrigin::Counter)
                }
                Placement::Fixed(priority) => (priority, PriorityOrigin::Fixed),
            }
        };

        self.slots.push(Slot {
            kind,
            state,
            priority,
            origin,
            active: false,
        });
        self.by_kind.insert(kind, index);
        if origin == PriorityOrigin::Fixed {
            self.last_priority = self.slots.iter().map(|s| s.priority).max().unwrap_or(0);
        }
        self.rebuild_order();
        debug!(state = kind.name(), priority, ?origin, "registered state");

        if index == DEFAULT_SLOT {
            self.current = DEFAULT_SLOT;
            if self.config.activation == Activation::Immediate {
                self.activate()?;
            }
        }
        Ok(priority)
    }

    /// Enter the default state under [`Activation::Deferred`].
    ///
    /// Call once, after every state is registered.
    pub fn begin(&mut self) -> Result<(), FsmError> {
        if self.started {
            return Err(FsmError::AlreadyStarted);
        }
        if self.slots.is_empty() {
            return Err(FsmError::invariant("cannot begin without a registered state"));
        }
        self.activate()
    }

    fn activate(&mut self) -> Result<(), FsmError> {
        self.started = true;
        self.slots[DEFAULT_SLOT].active = true;
        debug!(state = self.slots[DEFAULT_SLOT].kind.name(), "machine started");
        self.run_hook(DEFAULT_SLOT, Phase::OnEnter, |state, props| state.on_enter(props))
    }

    /// Run one frame: condition refresh, arbitration, then the current
    /// state's update, each subject to its gate.
    ///
    /// A hook error aborts the rest of the tick and is returned with the
    /// failing state's kind and phase.
    pub fn update(&mut self) -> Result<Arbitration<K>, FsmError> {
        self.ensure_running()?;
        let gates = self.config.gates;

        if gates.conditions {
            for index in 0..self.slots.len() {
                self.run_hook(index, Phase::UpdateCondition, |state, props| {
                    state.update_condition(props)
                })?;
            }
        }

        let outcome = if gates.transitions {
            self.arbitrate()?
        } else {
            Arbitration::Skipped
        };

        if gates.updates {
            let current = self.current;
            self.run_hook(current, Phase::Update, |state, props| state.update(props))?;
        }

        self.tick += 1;
        Ok(outcome)
    }

    /// Run the fixed-step update of the current state. Never arbitrates.
    pub fn fixed_update(&mut self) -> Result<(), FsmError> {
        self.ensure_running()?;
        if self.config.gates.updates {
            let current = self.current;
            self.run_hook(current, Phase::FixedUpdate, |state, props| {
                state.fixed_update(props)
            })?;
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), FsmError> {
        if self.slots.is_empty() {
            return Err(FsmError::invariant("no current state: nothing registered"));
        }
        if !self.started {
            return Err(FsmError::NotStarted);
        }
        Ok(())
    }

    fn arbitrate(&mut self) -> Result<Arbitration<K>, FsmError> {
        let current = self.current;
        let exiting = self.slots[current]
            .state
            .exit(&self.props)
            .map_err(|source| self.fault(current, Phase::Exit, source))?;

        let mut target = if exiting { DEFAULT_SLOT } else { current };
        let mut selected = false;
        for position in 0..self.order.len() {
            let index = self.order[position];
            let candidate = &self.slots[index];
            if candidate.priority < self.slots[target].priority {
                continue;
            }
            if index == current && !candidate.state.can_transition_self() {
                continue;
            }
            let wants = candidate
                .state
                .enter(&self.props)
                .map_err(|source| self.fault(index, Phase::Enter, source))?;
            if wants {
                target = index;
                selected = true;
            }
        }

        if target == current && !selected {
            trace!(tick = self.tick, state = self.slots[current].kind.name(), exiting, "no transition");
            return Ok(Arbitration::Stayed);
        }

        let reason = if target == current {
            TransitionReason::Reentered
        } else if !exiting {
            TransitionReason::Preempted
        } else if target == DEFAULT_SLOT {
            TransitionReason::Fallback
        } else {
            TransitionReason::Replaced
        };
        self.handoff(target, reason).map(Arbitration::Transitioned)
    }

    fn handoff(
        &mut self,
        target: usize,
        reason: TransitionReason,
    ) -> Result<TransitionRecord<K>, FsmError> {
        let current = self.current;
        if !self.slots[current].active {
            return Err(FsmError::invariant(format!(
                "{} would exit without a prior on_enter",
                self.slots[current].kind.name()
            )));
        }

        self.run_hook(current, Phase::OnExit, |state, props| state.on_exit(props))?;
        self.slots[current].active = false;
        self.current = target;
        self.slots[target].active = true;

        let record = TransitionRecord {
            from: self.slots[current].kind,
            to: self.slots[target].kind,
            tick: self.tick,
            reason,
        };
        self.history.push(record.clone());
        debug!(
            from = record.from.name(),
            to = record.to.name(),
            ?reason,
            tick = self.tick,
            "state handoff"
        );

        // Committed: a failing on_enter still consumes this tick.
        let entered = self.run_hook(target, Phase::OnEnter, |state, props| state.on_enter(props));
        if entered.is_err() {
            self.tick += 1;
        }
        entered.map(|_| record)
    }

    fn run_hook<F>(&mut self, index: usize, phase: Phase, hook: F) -> Result<(), FsmError>
    where
        F: FnOnce(&mut dyn State<K, P>, &mut P) -> HookResult,
    {
        let result = hook(self.slots[index].state.as_mut(), &mut self.props);
        result.map_err(|source| self.fault(index, phase, source))
    }

    fn fault(&self, index: usize, phase: Phase, source: StateError) -> FsmError {
        let kind = self.slots[index].kind.name();
        warn!(state = kind, %phase, error = %source, tick = self.tick, "state hook failed");
        FsmError::Hook {
            kind,
            phase,
            source,
        }
    }

    fn rebuild_order(&mut self) {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by_key(|&index| (self.slots[index].priority, index));
        self.order = order;
    }

    /// Change the priority of a registered state.
    ///
    /// The default state is pinned at 0. The running counter used by
    /// [`register`](Self::register) is left unchanged. Returns the previous
    /// priority.
    pub fn set_priority(&mut self, kind: K, priority: i32) -> Result<i32, FsmError> {
        let index = *self
            .by_kind
            .get(&kind)
            .ok_or(FsmError::UnknownState { kind: kind.name() })?;

        if index == DEFAULT_SLOT {
            if priority != 0 {
                return Err(FsmError::DefaultPriorityFixed {
                    kind: kind.name(),
                    requested: priority,
                });
            }
            return Ok(0);
        }

        let slot = &mut self.slots[index];
        let previous = std::mem::replace(&mut slot.priority, priority);
        slot.origin = PriorityOrigin::Reassigned;
        self.rebuild_order();
        debug!(state = kind.name(), previous, priority, "priority reassigned");
        Ok(previous)
    }

    /// Find a registered state by kind. A miss is not an error.
    pub fn lookup(&self, kind: K) -> Option<&dyn State<K, P>> {
        self.by_kind
            .get(&kind)
            .map(|&index| self.slots[index].state.as_ref())
    }

    pub fn lookup_mut(&mut self, kind: K) -> Option<&mut dyn State<K, P>> {
        let index = *self.by_kind.get(&kind)?;
        let state: &mut dyn State<K, P> = self.slots[index].state.as_mut();
        Some(state)
    }

    pub fn contains(&self, kind: K) -> bool {
        self.by_kind.contains_key(&kind)
    }

    pub fn priority_of(&self, kind: K) -> Option<i32> {
        self.by_kind.get(&kind).map(|&index| self.slots[index].priority)
    }

    /// The running priority counter.
    pub fn last_priority(&self) -> i32 {
        self.last_priority
    }

    pub fn current_kind(&self) -> Option<K> {
        self.slots.get(self.current).map(|slot| slot.kind)
    }

    pub fn default_kind(&self) -> Option<K> {
        self.slots.get(DEFAULT_SLOT).map(|slot| slot.kind)
    }

    /// Whether the default state is current.
    pub fn is_default(&self) -> bool {
        !self.slots.is_empty() && self.current == DEFAULT_SLOT
    }

    /// Registered kinds in arbitration order.
    pub fn kinds(&self) -> Vec<K> {
        self.order.iter().map(|&index| self.slots[index].kind).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of completed [`update`](Self::update) calls, plus any update
    /// that committed a handoff before the target's `on_enter` failed.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut P {
        &mut self.props
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn gates(&self) -> RunGates {
        self.config.gates
    }

    pub fn gates_mut(&mut self) -> &mut RunGates {
        &mut self.config.gates
    }

    pub fn set_gates(&mut self, gates: RunGates) {
        self.config.gates = gates;
    }

    pub fn history(&self) -> &TransitionLog<K> {
        &self.history
    }

    /// Capture a serializable view of the machine for diagnostics.
    pub fn snapshot(&self) -> MachineSnapshot<K> {
        let states = self
            .order
            .iter()
            .map(|&index| {
                let slot = &self.slots[index];
                StateEntry {
                    kind: slot.kind,
                    index,
                    priority: slot.priority,
                    origin: slot.origin,
                    active: slot.active,
                    can_transition_self: slot.state.can_transition_self(),
                }
            })
            .collect();

        MachineSnapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            tick: self.tick,
            started: self.started,
            current: self.current_kind(),
            default: self.default_kind(),
            gates: self.config.gates,
            last_priority: self.last_priority,
            states,
            history: self.history.clone(),
        }
    }

    /// Re-check the machine's invariants, collecting every violation.
    pub fn audit(&self) -> Validation<(), NonEmptyVec<Violation>> {
        audit::audit(&self.snapshot())
    }
}
