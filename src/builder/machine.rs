//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{State, StateKind};
use crate::machine::{Activation, MachineConfig, Placement, RunGates, StateMachine};

/// Builder for constructing state machines with a fluent API.
///
/// States are registered in the order they are added, so the first one
/// becomes the default.
pub struct StateMachineBuilder<K: StateKind, P> {
    props: P,
    config: MachineConfig,
    states: Vec<(Box<dyn State<K, P>>, Placement)>,
}

impl<K: StateKind, P> StateMachineBuilder<K, P> {
    /// Create a new builder around the shared props.
    pub fn new(props: P) -> Self {
        Self {
            props,
            config: MachineConfig::default(),
            states: Vec::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.config.activation = activation;
        self
    }

    pub fn gates(mut self, gates: RunGates) -> Self {
        self.config.gates = gates;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Add a state one priority step above the previous one.
    pub fn state<S>(self, state: S) -> Self
    where
        S: State<K, P> + 'static,
    {
        self.state_with_increment(state, 1)
    }

    /// Add a state `increment` steps above the previous one.
    pub fn state_with_increment<S>(mut self, state: S, increment: u32) -> Self
    where
        S: State<K, P> + 'static,
    {
        self.states
            .push((Box::new(state), Placement::Increment(increment)));
        self
    }

    /// Add a state at a fixed priority.
    pub fn state_at<S>(mut self, state: S, priority: i32) -> Self
    where
        S: State<K, P> + 'static,
    {
        self.states.push((Box::new(state), Placement::Fixed(priority)));
        self
    }

    /// Build the state machine.
    ///
    /// Under [`Activation::Immediate`] the default state is entered here.
    /// Under [`Activation::Deferred`] the caller still has to `begin`.
    pub fn build(self) -> Result<StateMachine<K, P>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = StateMachine::with_config(self.props, self.config);
        for (state, placement) in self.states {
            machine.insert(state, placement)?;
        }

        Ok(machine)
    }
}

impl<K: StateKind, P: Default> Default for StateMachineBuilder<K, P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HookResult;
    use crate::machine::FsmError;

    crate::state_kind! {
        enum Mode {
            Idle,
            Walk,
            Run,
        }
    }

    #[derive(Default)]
    struct Props {
        speed: f32,
        entered: Vec<Mode>,
    }

    struct Gait {
        kind: Mode,
        threshold: f32,
    }

    impl State<Mode, Props> for Gait {
        fn kind(&self) -> Mode {
            self.kind
        }

        fn enter(&self, props: &Props) -> HookResult<bool> {
            Ok(props.speed >= self.threshold)
        }

        fn exit(&self, props: &Props) -> HookResult<bool> {
            Ok(props.speed < self.threshold)
        }

        fn on_enter(&mut self, props: &mut Props) -> HookResult {
            props.entered.push(self.kind);
            Ok(())
        }
    }

    fn gait(kind: Mode, threshold: f32) -> Gait {
        Gait { kind, threshold }
    }

    #[test]
    fn builder_requires_states() {
        let result = StateMachineBuilder::<Mode, Props>::default().build();

        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new(Props::default())
            .history_capacity(4)
            .state(gait(Mode::Idle, f32::INFINITY))
            .state(gait(Mode::Walk, 0.5))
            .state_with_increment(gait(Mode::Run, 3.0), 5)
            .build()
            .unwrap();

        assert_eq!(machine.len(), 3);
        assert_eq!(machine.priority_of(Mode::Run), Some(6));
        assert_eq!(machine.config().history_capacity, 4);
        assert!(!machine.is_started());
        assert!(machine.props().entered.is_empty());
    }

    #[test]
    fn immediate_build_enters_default() {
        let mut machine = StateMachineBuilder::new(Props::default())
            .activation(Activation::Immediate)
            .state(gait(Mode::Idle, f32::INFINITY))
            .state_at(gait(Mode::Walk, 0.5), 2)
            .state_at(gait(Mode::Run, 3.0), 4)
            .build()
            .unwrap();

        assert!(machine.is_started());
        assert_eq!(machine.props().entered, vec![Mode::Idle]);

        machine.props_mut().speed = 1.0;
        machine.update().unwrap();
        assert_eq!(machine.current_kind(), Some(Mode::Walk));

        machine.props_mut().speed = 5.0;
        machine.update().unwrap();
        assert_eq!(machine.current_kind(), Some(Mode::Run));

        machine.props_mut().speed = 0.0;
        machine.update().unwrap();
        assert!(machine.is_default());
        assert_eq!(
            machine.props().entered,
            vec![Mode::Idle, Mode::Walk, Mode::Run, Mode::Idle]
        );
    }

    #[test]
    fn duplicate_state_fails_build() {
        let result = StateMachineBuilder::new(Props::default())
            .state(gait(Mode::Idle, f32::INFINITY))
            .state(gait(Mode::Walk, 0.5))
            .state(gait(Mode::Walk, 1.0))
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Machine(FsmError::DuplicateState { kind: "Walk" }))
        ));
    }

    #[test]
    fn gates_are_applied() {
        let machine = StateMachineBuilder::new(Props::default())
            .gates(RunGates::none())
            .state(gait(Mode::Idle, f32::INFINITY))
            .build()
            .unwrap();

        assert_eq!(machine.gates(), RunGates::none());
    }
}
