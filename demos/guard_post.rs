//! Guard Post
//!
//! A guard that idles at its post, attacks when told to, and flinches every
//! time it is hit.
//!
//! Key concepts:
//! - Priority preemption (hurt beats attack beats idle)
//! - Fallback to the default state when a state gives up control
//! - Self re-entry for a state that restarts on every hit
//! - Handoff logging through `tracing`
//!
//! Run with: RUST_LOG=reflex=debug cargo run --example guard_post

use reflex::behaviors::IdleState;
use reflex::props::EntityProps;
use reflex::{state_kind, HookResult, State, StateKind, StateMachineBuilder};

state_kind! {
    enum Guard {
        Idle,
        Attack,
        Hurt,
    }
}

struct Attack;

impl State<Guard, EntityProps> for Attack {
    fn kind(&self) -> Guard {
        Guard::Attack
    }

    fn enter(&self, props: &EntityProps) -> HookResult<bool> {
        Ok(props.attack_key)
    }

    fn exit(&self, props: &EntityProps) -> HookResult<bool> {
        Ok(!props.attack_key)
    }

    fn on_enter(&mut self, props: &mut EntityProps) -> HookResult {
        println!("  {} swings", props.name);
        Ok(())
    }

    fn update(&mut self, props: &mut EntityProps) -> HookResult {
        props.velocity.x = props.direction.x * props.speed * props.attacking_move_drag;
        Ok(())
    }
}

/// Restarts its flinch on every hit.
struct Hurt {
    frames_left: u32,
}

impl State<Guard, EntityProps> for Hurt {
    fn kind(&self) -> Guard {
        Guard::Hurt
    }

    fn can_transition_self(&self) -> bool {
        true
    }

    fn enter(&self, props: &EntityProps) -> HookResult<bool> {
        Ok(props.hurt_key)
    }

    fn exit(&self, _props: &EntityProps) -> HookResult<bool> {
        Ok(self.frames_left == 0)
    }

    fn on_enter(&mut self, props: &mut EntityProps) -> HookResult {
        self.frames_left = 2;
        props.hurt_key = false;
        println!("  {} is hit", props.name);
        Ok(())
    }

    fn update(&mut self, _props: &mut EntityProps) -> HookResult {
        self.frames_left = self.frames_left.saturating_sub(1);
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== Guard Post ===\n");

    let mut machine = StateMachineBuilder::new(EntityProps::named("guard"))
        .state(IdleState::new(Guard::Idle))
        .state(Attack)
        .state(Hurt { frames_left: 0 })
        .build()
        .expect("guard states are distinct");
    machine.begin().expect("fresh machine");

    // (attack held, hit this frame)
    let script = [
        (false, false),
        (true, false),
        (true, false),
        (true, true),
        (true, true),
        (true, false),
        (true, false),
        (false, false),
        (false, false),
    ];

    for (frame, (attack, hit)) in script.into_iter().enumerate() {
        let props = machine.props_mut();
        props.attack_key = attack;
        props.hurt_key |= hit;

        let outcome = machine.update().expect("guard hooks never fail");
        let current = machine.current_kind().map(|kind| kind.name()).unwrap_or("-");
        match outcome.record() {
            Some(record) => println!(
                "frame {frame}: {} -> {} ({:?})",
                record.from.name(),
                record.to.name(),
                record.reason
            ),
            None => println!("frame {frame}: stays in {current}"),
        }
    }

    println!("\nPath taken:");
    for record in machine.history().records() {
        println!("  tick {:>2}: {:?} -> {:?}", record.tick, record.from, record.to);
    }

    println!("\n=== Example Complete ===");
}
