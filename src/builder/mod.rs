//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder for assembling a machine from its
//! props, configuration and states, and the `state_kind!` macro for
//! declaring kind enums with minimal boilerplate.
//!
//! # Example
//!
//! ```
//! use reflex::builder::StateMachineBuilder;
//! use reflex::core::{HookResult, State};
//! use reflex::machine::Activation;
//! use reflex::state_kind;
//!
//! state_kind! {
//!     enum Light {
//!         Off,
//!         On,
//!     }
//! }
//!
//! struct Off;
//!
//! impl State<Light, bool> for Off {
//!     fn kind(&self) -> Light {
//!         Light::Off
//!     }
//!
//!     fn enter(&self, _switch: &bool) -> HookResult<bool> {
//!         Ok(false)
//!     }
//! }
//!
//! struct On;
//!
//! impl State<Light, bool> for On {
//!     fn kind(&self) -> Light {
//!         Light::On
//!     }
//!
//!     fn enter(&self, switch: &bool) -> HookResult<bool> {
//!         Ok(*switch)
//!     }
//!
//!     fn exit(&self, switch: &bool) -> HookResult<bool> {
//!         Ok(!*switch)
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::new(false)
//!     .activation(Activation::Immediate)
//!     .state(Off)
//!     .state(On)
//!     .build()
//!     .unwrap();
//!
//! *machine.props_mut() = true;
//! machine.update().unwrap();
//! assert_eq!(machine.current_kind(), Some(Light::On));
//! ```

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
