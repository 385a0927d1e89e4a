//! Reflex: a priority-arbitrated finite state machine for entity behavior
//!
//! Reflex drives AI agents and characters from a real-time tick loop. Each
//! entity owns one flat machine holding a set of competing states. Every
//! tick, the machine lets each state refresh its preconditions, picks the
//! highest-priority state that wants control, hands control over with paired
//! exit/enter hooks, and runs the winner's update.
//!
//! # Core Concepts
//!
//! - **State**: a unit of behavior implementing the `State` trait
//! - **Priority**: integer order assigned at registration; higher preempts lower
//! - **Default state**: the first state registered, priority 0, the fallback
//!   whenever the current state gives up control
//! - **Props**: shared entity context threaded through every hook
//! - **Run gates**: switches for the condition, arbitration and update passes
//!
//! # Example
//!
//! ```rust
//! use reflex::behaviors::IdleState;
//! use reflex::core::{HookResult, State};
//! use reflex::machine::StateMachine;
//! use reflex::props::EntityProps;
//! use reflex::state_kind;
//!
//! state_kind! {
//!     pub enum Ai {
//!         Idle,
//!         Attack,
//!     }
//! }
//!
//! struct Attack;
//!
//! impl State<Ai, EntityProps> for Attack {
//!     fn kind(&self) -> Ai {
//!         Ai::Attack
//!     }
//!
//!     fn enter(&self, props: &EntityProps) -> HookResult<bool> {
//!         Ok(props.attack_key)
//!     }
//!
//!     fn exit(&self, props: &EntityProps) -> HookResult<bool> {
//!         Ok(!props.attack_key)
//!     }
//! }
//!
//! let mut machine = StateMachine::new(EntityProps::named("goblin"));
//! machine.register(IdleState::new(Ai::Idle)).unwrap();
//! machine.register(Attack).unwrap();
//! machine.begin().unwrap();
//!
//! machine.props_mut().attack_key = true;
//! machine.update().unwrap();
//! assert_eq!(machine.current_kind(), Some(Ai::Attack));
//! ```

pub mod audit;
pub mod behaviors;
pub mod builder;
pub mod core;
pub mod machine;
pub mod props;
pub mod snapshot;

// Re-export commonly used types
pub use builder::StateMachineBuilder;
pub use self::core::{HookResult, Phase, State, StateError, StateKind};
pub use machine::{Activation, Arbitration, FsmError, MachineConfig, RunGates, StateMachine};
