//! Player input snapshot consumed once per frame
//!
//! Raw device events are captured outside the crate and folded into a
//! `PlayerInput` before each step.

use serde::{Deserialize, Serialize};

use crate::util::angle::normalize_degrees;
use crate::util::vec2::Vec2;

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldDirections {
    /// 8-way unit vector (zero when nothing or only opposing keys are held)
    pub fn vector(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down)).normalize()
    }
}

/// Turret aim target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Aim {
    /// Absolute angle in degrees
    Angle(f32),
    /// Arena-space point, e.g. the pointer position
    Point(Vec2),
}

/// Per-frame intent for the player tank
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement direction; longer vectors are normalized
    pub movement: Vec2,
    pub aim: Option<Aim>,
    /// Fire trigger for this frame
    pub fire: bool,
}

impl PlayerInput {
    pub fn from_keys(keys: HeldDirections) -> Self {
        Self {
            movement: keys.vector(),
            ..Default::default()
        }
    }

    pub fn with_aim_angle(mut self, degrees: f32) -> Self {
        self.aim = Some(Aim::Angle(degrees));
        self
    }

    pub fn with_aim_point(mut self, point: Vec2) -> Self {
        self.aim = Some(Aim::Point(point));
        self
    }

    pub fn with_fire(mut self, fire: bool) -> Self {
        self.fire = fire;
        self
    }

    /// Movement intent with magnitude at most 1
    pub fn movement_direction(&self) -> Vec2 {
        if !self.movement.is_finite() {
            return Vec2::ZERO;
        }
        self.movement.clamp_length(1.0)
    }

    /// Aim angle in degrees as seen from `origin`. An aim point on top of
    /// the origin gives no angle.
    pub fn aim_angle(&self, origin: Vec2) -> Option<f32> {
        match self.aim? {
            Aim::Angle(degrees) if degrees.is_finite() => Some(normalize_degrees(degrees)),
            Aim::Angle(_) => None,
            Aim::Point(point) => {
                let delta = point - origin;
                if delta.length_sq() > f32::EPSILON && delta.is_finite() {
                    Some(normalize_degrees(delta.angle_degrees()))
                } else {
                    None
                }
            }
        }
    }
}
