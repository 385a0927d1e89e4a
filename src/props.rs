//! Shared entity context for character and AI behaviors.
//!
//! The machine is generic over its props and never looks inside them.
//! [`EntityProps`] is a ready-made context for 2D characters: movement,
//! facing, and the intent flags combat, damage and jumping behaviors use to
//! coordinate without talking to each other directly.

use serde::{Deserialize, Serialize};

/// Plain 2D vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// How the move-boost key is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySwitch {
    /// Boost toggles on each press
    KeyDown,
    /// Boost holds while the key is held
    #[default]
    Key,
}

/// Movement, facing and intent flags for one entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityProps {
    pub name: String,

    pub position: Vec2,
    pub velocity: Vec2,
    /// Desired movement direction, written by input or AI behaviors
    pub direction: Vec2,
    /// `1` facing right, `-1` facing left
    pub face: i32,
    pub is_ground: bool,

    pub speed: f32,
    /// Multiplier applied while boosting
    pub speed_boost: f32,
    pub move_boost_key: bool,
    pub move_boost_key_type: KeySwitch,

    pub attack_key: bool,
    /// Movement multiplier while attacking
    pub attacking_move_drag: f32,

    pub hurt_key: bool,
    pub death_key: bool,

    pub jump_key: bool,
    pub jump_force: f32,
    /// Movement multiplier while airborne from a jump
    pub jumping_move_drag: f32,

    /// Seconds since the previous frame, set by the host before each update
    pub delta_time: f32,
}

impl Default for EntityProps {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            direction: Vec2::ZERO,
            face: 1,
            is_ground: true,
            speed: 1.0,
            speed_boost: 1.5,
            move_boost_key: false,
            move_boost_key_type: KeySwitch::default(),
            attack_key: false,
            attacking_move_drag: 0.5,
            hurt_key: false,
            death_key: false,
            jump_key: false,
            jump_force: 5.0,
            jumping_move_drag: 0.8,
            delta_time: 0.0,
        }
    }
}

impl EntityProps {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Horizontal speed after applying the boost.
    pub fn effective_speed(&self) -> f32 {
        if self.move_boost_key {
            self.speed * self.speed_boost
        } else {
            self.speed
        }
    }

    /// Turn to face the sign of `dx`. Zero keeps the current facing.
    pub fn face_toward(&mut self, dx: f32) {
        if dx > 0.0 {
            self.face = 1;
        } else if dx < 0.0 {
            self.face = -1;
        }
    }

    /// Whether any damage flag is raised.
    pub fn is_harmed(&self) -> bool {
        self.hurt_key || self.death_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_multiplies_speed() {
        let mut props = EntityProps {
            speed: 2.0,
            speed_boost: 1.5,
            ..EntityProps::default()
        };
        assert_eq!(props.effective_speed(), 2.0);

        props.move_boost_key = true;
        assert_eq!(props.effective_speed(), 3.0);
    }

    #[test]
    fn facing_follows_sign_and_ignores_zero() {
        let mut props = EntityProps::named("slime");
        props.face_toward(-0.4);
        assert_eq!(props.face, -1);
        props.face_toward(0.0);
        assert_eq!(props.face, -1);
        props.face_toward(2.0);
        assert_eq!(props.face, 1);
    }

    #[test]
    fn partial_document_uses_defaults() {
        let props: EntityProps =
            serde_json::from_str(r#"{ "name": "bat", "move_boost_key_type": "key_down" }"#)
                .unwrap();

        assert_eq!(props.name, "bat");
        assert_eq!(props.move_boost_key_type, KeySwitch::KeyDown);
        assert_eq!(props.face, 1);
        assert!(props.is_ground);
    }

    #[test]
    fn vector_length() {
        assert_eq!(Vec2::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vec2::ZERO.length(), 0.0);
    }

    #[test]
    fn harm_flags() {
        let mut props = EntityProps::default();
        assert!(!props.is_harmed());
        props.death_key = true;
        assert!(props.is_harmed());
    }
}
