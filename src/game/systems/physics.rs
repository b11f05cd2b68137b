//! Tank movement integration and collision response
//!
//! Acceleration-based movement with exponential (or linear) decay, wrap-aware
//! rotation smoothing, then collision resolution in a fixed order:
//! arena boundary, obstacles (per-axis slide), tank-tank (spatial grid).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::game::constants::{ai, physics, tank};
use crate::game::spatial::TankGrid;
use crate::game::state::{Arena, GameState, Tank};
use crate::game::systems::collision::{clamp_into_arena, obstacle_penetration, within_x, within_y};
use crate::util::angle::rotate_towards;
use crate::util::vec2::Vec2;

/// How velocity bleeds off when no movement input is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecayMode {
    /// velocity *= exp(-DECAY_RATE * dt)
    Exponential,
    /// speed -= LINEAR_DECELERATION * dt
    Linear,
}

impl FromStr for DecayMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exponential" | "exp" => Ok(DecayMode::Exponential),
            "linear" => Ok(DecayMode::Linear),
            _ => Err(ConfigError::InvalidValue {
                key: "ARENA_DECAY_MODE",
                value: s.to_string(),
            }),
        }
    }
}

/// What happens to the blocked axis velocity on an arena-wall hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Reflect with BOUNDARY_RESTITUTION
    Bounce,
    /// Zero the axis velocity
    Stop,
}

impl FromStr for BoundaryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bounce" => Ok(BoundaryMode::Bounce),
            "stop" => Ok(BoundaryMode::Stop),
            _ => Err(ConfigError::InvalidValue {
                key: "ARENA_BOUNDARY_MODE",
                value: s.to_string(),
            }),
        }
    }
}

/// Movement settings for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    pub decay_mode: DecayMode,
    pub boundary_mode: BoundaryMode,
    pub turret_rotation_speed: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            decay_mode: DecayMode::Exponential,
            boundary_mode: BoundaryMode::Bounce,
            turret_rotation_speed: physics::TURRET_ROTATION_SPEED,
        }
    }
}

/// Per-tank movement request for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    /// Desired movement direction, magnitude in [0, 1]
    pub direction: Vec2,
    /// Turret aim angle in degrees (player tank)
    pub turret_target: Option<f32>,
    /// Turn the body toward the velocity heading. AI tanks steer their
    /// body toward the target themselves and leave this off.
    pub follow_heading: bool,
}

impl Default for MovementIntent {
    fn default() -> Self {
        Self {
            direction: Vec2::ZERO,
            turret_target: None,
            follow_heading: true,
        }
    }
}

impl MovementIntent {
    /// Intent that keeps the current facing and lets velocity decay
    pub fn idle_ai() -> Self {
        Self {
            follow_heading: false,
            ..Default::default()
        }
    }
}

/// Summary of one physics pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsReport {
    pub wall_hits: usize,
    pub tank_contacts: usize,
}

/// Acceleration and top speed for a tank before power-up multipliers
#[inline]
fn movement_limits(tank: &Tank) -> (f32, f32) {
    if tank.is_player {
        (physics::ACCELERATION, physics::MAX_SPEED)
    } else {
        (
            physics::ACCELERATION * ai::ACCELERATION_FACTOR,
            physics::MAX_SPEED * ai::MAX_SPEED_FACTOR,
        )
    }
}

/// Apply intent (or decay) to a tank's velocity
pub fn apply_intent(tank: &mut Tank, intent: &MovementIntent, decay_mode: DecayMode, dt: f32) {
    let (acceleration, max_speed) = movement_limits(tank);
    // Re-read every frame; power-ups change this mid-match
    let speed_multiplier = tank.speed_multiplier;
    let direction = if intent.direction.is_finite() {
        intent.direction.clamp_length(1.0)
    } else {
        Vec2::ZERO
    };

    if direction.length_sq() > 0.0 {
        tank.velocity += direction * acceleration * speed_multiplier * dt;
    } else {
        match decay_mode {
            DecayMode::Exponential => {
                tank.velocity *= (-physics::DECAY_RATE * dt).exp();
            }
            DecayMode::Linear => {
                let (dir, speed) = tank.velocity.normalize_with_length();
                let slowed = (speed - physics::LINEAR_DECELERATION * dt).max(0.0);
                tank.velocity = dir * slowed;
            }
        }
        if tank.velocity.length() < physics::VELOCITY_THRESHOLD {
            tank.velocity = Vec2::ZERO;
        }
    }

    tank.velocity = tank.velocity.clamp_length(max_speed * speed_multiplier);
}

/// Turn the body toward its movement heading and the turret toward its aim
pub fn apply_rotation(tank: &mut Tank, intent: &MovementIntent, turret_speed: f32, dt: f32) {
    if intent.follow_heading && tank.velocity.length() > physics::VELOCITY_THRESHOLD {
        let heading = tank.velocity.angle_degrees();
        tank.rotation = rotate_towards(tank.rotation, heading, physics::ROTATION_SPEED * dt);
    }

    if let (Some(current), Some(target)) = (tank.turret_rotation, intent.turret_target) {
        if target.is_finite() {
            tank.turret_rotation = Some(rotate_towards(current, target, turret_speed * dt));
        }
    }
}

/// Move a tank by its velocity and resolve arena-wall and obstacle contacts.
/// Returns true if the arena wall blocked the move.
pub fn integrate_position(
    tank: &mut Tank,
    arena: &Arena,
    boundary_mode: BoundaryMode,
    dt: f32,
) -> bool {
    let radius = tank::RADIUS;
    let old = tank.position;
    let mut new = old + tank.velocity * dt;
    let mut hit_wall = false;

    let reflect = |v: f32| match boundary_mode {
        BoundaryMode::Bounce => -v * physics::BOUNDARY_RESTITUTION,
        BoundaryMode::Stop => 0.0,
    };

    if !within_x(arena, new.x, radius) {
        new.x = old.x;
        tank.velocity.x = reflect(tank.velocity.x);
        hit_wall = true;
    }
    if !within_y(arena, new.y, radius) {
        new.y = old.y;
        tank.velocity.y = reflect(tank.velocity.y);
        hit_wall = true;
    }
    if hit_wall {
        new = clamp_into_arena(arena, new, radius);
    }

    // A tank already inside an obstacle may take any move that digs it out
    let start_depth = obstacle_penetration(arena, old, radius);
    let allowed = |p: Vec2| {
        let depth = obstacle_penetration(arena, p, radius);
        depth <= 0.0 || depth < start_depth
    };

    if !allowed(new) {
        let x_only = Vec2::new(new.x, old.y);
        let y_only = Vec2::new(old.x, new.y);

        if allowed(x_only) {
            new = x_only;
            tank.velocity.y = 0.0;
        } else if allowed(y_only) {
            new = y_only;
            tank.velocity.x = 0.0;
        } else {
            new = old;
            tank.velocity = -tank.velocity * physics::OBSTACLE_RESTITUTION;
        }
    }

    tank.position = new;
    hit_wall
}

/// Target of a separation push, or None if it would drive the tank deeper
/// into an obstacle
fn shove(arena: &Arena, from: Vec2, offset: Vec2) -> Option<Vec2> {
    let target = clamp_into_arena(arena, from + offset, tank::RADIUS);
    let before = obstacle_penetration(arena, from, tank::RADIUS);
    let after = obstacle_penetration(arena, target, tank::RADIUS);
    (after <= before).then_some(target)
}

/// Separate overlapping Active tanks and exchange momentum.
/// Returns the number of contacts resolved.
pub fn resolve_tank_collisions(tanks: &mut [Tank], arena: &Arena, grid: &mut TankGrid) -> usize {
    grid.rebuild(tanks);

    let mut contacts = 0;
    for i in 0..tanks.len() {
        if !tanks[i].is_active() {
            continue;
        }
        let candidates = grid.query(tanks[i].position);
        for entry in candidates.iter().filter(|e| e.index > i) {
            let (head, tail) = tanks.split_at_mut(entry.index);
            let a = &mut head[i];
            let b = &mut tail[0];

            let delta = b.position - a.position;
            let distance = delta.length();
            if distance >= tank::DIAMETER {
                continue;
            }

            // Coincident centers have no direction; push along +X
            let normal = if distance > f32::EPSILON {
                delta * (1.0 / distance)
            } else {
                Vec2::RIGHT
            };

            // Split the push; a side blocked by an obstacle hands it to the other
            let overlap = tank::DIAMETER - distance;
            let half = overlap * 0.5;
            let a_half = shove(arena, a.position, normal * -half);
            let b_half = shove(arena, b.position, normal * half);
            let (a_next, b_next) = match (a_half, b_half) {
                (None, Some(b_pos)) => {
                    let full = shove(arena, b.position, normal * overlap);
                    (None, full.or(Some(b_pos)))
                }
                (Some(a_pos), None) => {
                    let full = shove(arena, a.position, normal * -overlap);
                    (full.or(Some(a_pos)), None)
                }
                pair => pair,
            };
            if let Some(p) = a_next {
                a.position = p;
            }
            if let Some(p) = b_next {
                b.position = p;
            }

            let closing = (a.velocity - b.velocity).dot(normal);
            if closing > 0.0 {
                // Equal masses
                let impulse = (1.0 + physics::TANK_RESTITUTION) * closing * 0.5;
                a.velocity -= normal * impulse;
                b.velocity += normal * impulse;
            }

            contacts += 1;
        }
    }

    contacts
}

/// Advance every Active tank one frame. `intents` is indexed like `state.tanks`;
/// missing entries are treated as idle.
pub fn update(
    state: &mut GameState,
    intents: &[MovementIntent],
    settings: &PhysicsSettings,
    grid: &mut TankGrid,
    dt: f32,
) -> PhysicsReport {
    let mut report = PhysicsReport::default();
    let arena = &state.arena;

    for (index, tank) in state.tanks.iter_mut().enumerate() {
        if !tank.is_active() {
            continue;
        }
        let intent = intents.get(index).copied().unwrap_or_else(|| {
            if tank.is_player {
                MovementIntent::default()
            } else {
                MovementIntent::idle_ai()
            }
        });

        apply_intent(tank, &intent, settings.decay_mode, dt);
        apply_rotation(tank, &intent, settings.turret_rotation_speed, dt);
        if integrate_position(tank, arena, settings.boundary_mode, dt) {
            report.wall_hits += 1;
        }
    }

    report.tank_contacts = resolve_tank_collisions(&mut state.tanks, arena, grid);
    report
}
