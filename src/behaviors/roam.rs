//! Periodic wandering for AI entities.
//!
//! Roaming alternates between waiting and wandering for random durations.
//! The schedule lives in a [`RoamTimer`] clocked by the frame delta in
//! [`EntityProps::delta_time`], so it advances on the same tick loop as the
//! machine and needs no background task. The timer talks to arbitration only
//! through the state's roaming flag and the props' direction.
//!
//! Whoever creates a [`RoamState`] keeps its [`RoamHandle`] to cancel the
//! schedule after the state has been moved into a machine.

use crate::core::{HookResult, State, StateKind};
use crate::props::EntityProps;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Durations are in seconds, speeds in direction units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoamConfig {
    pub wait_min: f32,
    pub wait_max: f32,
    pub roam_min: f32,
    pub roam_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Chance that a roam leg stands still instead of moving
    pub idle_rate: f64,
}

impl Default for RoamConfig {
    fn default() -> Self {
        Self {
            wait_min: 1.0,
            wait_max: 3.0,
            roam_min: 1.0,
            roam_max: 3.0,
            speed_min: 0.3,
            speed_max: 1.0,
            idle_rate: 0.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum RoamPhase {
    Waiting { remaining: f32 },
    Roaming { remaining: f32 },
}

/// Emitted by [`RoamTimer::advance`] when the schedule flips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoamEvent {
    /// A roam leg began; `velocity` is signed, zero for a standing leg
    Started { velocity: f32 },
    Stopped,
}

/// Tick-clocked wait/roam schedule.
pub struct RoamTimer {
    config: RoamConfig,
    phase: RoamPhase,
    rng: SmallRng,
    cancelled: bool,
}

impl RoamTimer {
    pub fn new(config: RoamConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let remaining = sample(&mut rng, config.wait_min, config.wait_max);
        Self {
            config,
            phase: RoamPhase::Waiting { remaining },
            rng,
            cancelled: false,
        }
    }

    /// Advance the schedule by `dt` seconds.
    ///
    /// Returns at most one event per call. Overshoot carries into the next
    /// phase.
    pub fn advance(&mut self, dt: f32) -> Option<RoamEvent> {
        if self.cancelled {
            return None;
        }

        match self.phase {
            RoamPhase::Waiting { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = RoamPhase::Waiting { remaining };
                    return None;
                }
                let leg = sample(&mut self.rng, self.config.roam_min, self.config.roam_max);
                self.phase = RoamPhase::Roaming {
                    remaining: leg + remaining,
                };
                Some(RoamEvent::Started {
                    velocity: self.pick_velocity(),
                })
            }
            RoamPhase::Roaming { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = RoamPhase::Roaming { remaining };
                    return None;
                }
                let wait = sample(&mut self.rng, self.config.wait_min, self.config.wait_max);
                self.phase = RoamPhase::Waiting {
                    remaining: wait + remaining,
                };
                Some(RoamEvent::Stopped)
            }
        }
    }

    fn pick_velocity(&mut self) -> f32 {
        let speed = sample(&mut self.rng, self.config.speed_min, self.config.speed_max);
        if self.rng.gen::<f64>() < self.config.idle_rate {
            0.0
        } else if self.rng.gen_bool(0.5) {
            speed
        } else {
            -speed
        }
    }

    pub fn is_roaming(&self) -> bool {
        matches!(self.phase, RoamPhase::Roaming { .. })
    }

    /// Stop the schedule for good. Later calls to `advance` do nothing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

fn sample(rng: &mut SmallRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Cancels a [`RoamState`] from outside the machine that owns it.
#[derive(Clone, Debug, Default)]
pub struct RoamHandle(Arc<AtomicBool>);

impl RoamHandle {
    /// Stop the schedule. The state gives up control on the next arbitration
    /// and never asks for it again.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Wanders left and right on a random schedule.
///
/// Wants control while a roam leg is running and gives it up when the leg
/// ends or the schedule is cancelled. Never re-enters itself.
pub struct RoamState<K: StateKind> {
    kind: K,
    timer: RoamTimer,
    roaming: bool,
    handle: RoamHandle,
}

impl<K: StateKind> RoamState<K> {
    pub fn new(kind: K, config: RoamConfig, seed: u64) -> Self {
        Self {
            kind,
            timer: RoamTimer::new(config, seed),
            roaming: false,
            handle: RoamHandle::default(),
        }
    }

    /// A cancel handle sharing this state's flag. Take it before registering.
    pub fn handle(&self) -> RoamHandle {
        self.handle.clone()
    }

    pub fn is_roaming(&self) -> bool {
        self.roaming && !self.handle.is_cancelled()
    }

    /// Cancel the schedule. The state stops asking for control.
    pub fn stop(&mut self) {
        self.handle.cancel();
        self.timer.cancel();
        self.roaming = false;
    }
}

impl<K: StateKind> State<K, EntityProps> for RoamState<K> {
    fn kind(&self) -> K {
        self.kind
    }

    fn enter(&self, _props: &EntityProps) -> HookResult<bool> {
        Ok(self.is_roaming())
    }

    fn exit(&self, _props: &EntityProps) -> HookResult<bool> {
        Ok(!self.is_roaming())
    }

    fn on_exit(&mut self, props: &mut EntityProps) -> HookResult {
        props.velocity.x = 0.0;
        Ok(())
    }

    fn update(&mut self, props: &mut EntityProps) -> HookResult {
        props.velocity.x = props.direction.x * props.effective_speed();
        props.position.x += props.velocity.x * props.delta_time;
        Ok(())
    }

    fn update_condition(&mut self, props: &mut EntityProps) -> HookResult {
        if self.handle.is_cancelled() {
            if !self.timer.is_cancelled() {
                debug!(entity = %props.name, "roaming cancelled");
                self.timer.cancel();
                self.roaming = false;
                props.direction.x = 0.0;
            }
            return Ok(());
        }

        match self.timer.advance(props.delta_time) {
            Some(RoamEvent::Started { velocity }) => {
                trace!(entity = %props.name, velocity, "roam leg started");
                self.roaming = true;
                props.direction.x = velocity;
                props.face_toward(velocity);
            }
            Some(RoamEvent::Stopped) => {
                trace!(entity = %props.name, "roam leg stopped");
                self.roaming = false;
                props.direction.x = 0.0;
            }
            None => {}
        }
        Ok(())
    }
}
