//! Roaming Agent
//!
//! A slime wanders around its spawn point on a random schedule and bolts
//! whenever an alarm raised by a background task is on.
//!
//! Key concepts:
//! - A tick-clocked `RoamState` sharing the host's frame delta
//! - A state whose wish is fed from outside the tick loop
//! - Cancelling a registered roam schedule through its handle
//! - Cancelling the background task when the host shuts down
//!
//! Run with: RUST_LOG=reflex=debug cargo run --example roaming_agent

use reflex::behaviors::{IdleState, RoamConfig, RoamState};
use reflex::props::EntityProps;
use reflex::{state_kind, HookResult, State, StateKind, StateMachineBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

state_kind! {
    enum Slime {
        Idle,
        Roam,
        Flee,
    }
}

/// Runs away from the spawn point while the alarm is raised.
struct Flee {
    alarm: Arc<AtomicBool>,
}

impl State<Slime, EntityProps> for Flee {
    fn kind(&self) -> Slime {
        Slime::Flee
    }

    fn enter(&self, _props: &EntityProps) -> HookResult<bool> {
        Ok(self.alarm.load(Ordering::Relaxed))
    }

    fn exit(&self, _props: &EntityProps) -> HookResult<bool> {
        Ok(!self.alarm.load(Ordering::Relaxed))
    }

    fn on_enter(&mut self, props: &mut EntityProps) -> HookResult {
        props.move_boost_key = true;
        let away = if props.position.x >= 0.0 { 1.0 } else { -1.0 };
        props.direction.x = away;
        props.face_toward(away);
        Ok(())
    }

    fn on_exit(&mut self, props: &mut EntityProps) -> HookResult {
        props.move_boost_key = false;
        props.direction.x = 0.0;
        props.velocity.x = 0.0;
        Ok(())
    }

    fn update(&mut self, props: &mut EntityProps) -> HookResult {
        props.velocity.x = props.direction.x * props.effective_speed();
        props.position.x += props.velocity.x * props.delta_time;
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== Roaming Agent ===\n");

    let alarm = Arc::new(AtomicBool::new(false));
    let siren = {
        let alarm = Arc::clone(&alarm);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(400));
            loop {
                ticker.tick().await;
                let raised = !alarm.load(Ordering::Relaxed);
                alarm.store(raised, Ordering::Relaxed);
            }
        })
    };

    let config = RoamConfig {
        wait_min: 0.1,
        wait_max: 0.3,
        roam_min: 0.2,
        roam_max: 0.5,
        ..RoamConfig::default()
    };
    let roam = RoamState::new(Slime::Roam, config, 7);
    let roam_handle = roam.handle();
    let mut machine = StateMachineBuilder::new(EntityProps::named("slime"))
        .state(IdleState::new(Slime::Idle))
        .state(roam)
        .state(Flee {
            alarm: Arc::clone(&alarm),
        })
        .build()
        .expect("slime states are distinct");
    machine.begin().expect("fresh machine");

    let frame = Duration::from_millis(50);
    let mut ticker = tokio::time::interval(frame);
    for frame_no in 0..40 {
        ticker.tick().await;
        if frame_no == 30 {
            println!("slime is tired of wandering");
            roam_handle.cancel();
        }
        machine.props_mut().delta_time = frame.as_secs_f32();
        let outcome = match machine.update() {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("tick failed: {err}");
                break;
            }
        };

        if let Some(record) = outcome.record() {
            println!(
                "tick {:>2}: {} -> {} at x = {:.2}",
                record.tick,
                record.from.name(),
                record.to.name(),
                machine.props().position.x
            );
        }
    }

    siren.abort();
    let _ = siren.await;

    println!("\nFinal position: {:.2}", machine.props().position.x);
    match machine.snapshot().to_json() {
        Ok(json) => println!("\nSnapshot:\n{json}"),
        Err(err) => eprintln!("snapshot failed: {err}"),
    }

    println!("\n=== Example Complete ===");
}
