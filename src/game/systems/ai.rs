use std::str::FromStr;

use hashbrown::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::game::constants::ai::*;
use crate::game::constants::{physics, weapon};
use crate::game::state::{GameState, TankId};
use crate::game::systems::physics::MovementIntent;
use crate::util::angle::{rotate_towards, shortest_angle_diff};
use crate::util::vec2::Vec2;

/// AI difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Tuning carried by a difficulty preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Seconds between decisions (before jitter)
    pub reaction_time: f32,
    /// 0.0-1.0
    pub accuracy: f32,
    /// 0.0-1.0
    pub aggressiveness: f32,
    /// Maximum firing distance (px)
    pub engagement_range: f32,
}

impl Difficulty {
    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                reaction_time: 0.8,
                accuracy: 0.6,
                aggressiveness: 0.4,
                engagement_range: 200.0,
            },
            Difficulty::Medium => DifficultyParams {
                reaction_time: 0.5,
                accuracy: 0.75,
                aggressiveness: 0.6,
                engagement_range: 250.0,
            },
            Difficulty::Hard => DifficultyParams {
                reaction_time: 0.2,
                accuracy: 0.9,
                aggressiveness: 0.8,
                engagement_range: 300.0,
            },
            Difficulty::Expert => DifficultyParams {
                reaction_time: 0.1,
                accuracy: 0.95,
                aggressiveness: 0.9,
                engagement_range: 350.0,
            },
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(ConfigError::InvalidValue {
                key: "ARENA_DIFFICULTY",
                value: s.to_string(),
            }),
        }
    }
}

/// AI behavior band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBehavior {
    /// No Active player to track
    Idle,
    /// Far from the player: close in
    Approach,
    /// Mid range: circle the player
    Strafe,
    /// Too close: back off with some lateral drift
    Retreat,
}

/// Deferred fire request, drained by the weapon system after physics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireCommand {
    pub tank_id: TankId,
}

/// AI state for one tank
#[derive(Debug, Clone)]
pub struct AiState {
    pub behavior: AiBehavior,
    /// Seconds until the next decision
    pub decision_timer: f32,
    /// +1 or -1: which perpendicular the strafe uses
    pub strafe_sign: f32,
    /// Lateral component mixed into a retreat
    pub retreat_jitter: f32,
    /// Steering output of the last update
    pub direction: Vec2,
}

impl Default for AiState {
    fn default() -> Self {
        Self {
            behavior: AiBehavior::Idle,
            decision_timer: 0.0,
            strafe_sign: 1.0,
            retreat_jitter: 0.0,
            direction: Vec2::ZERO,
        }
    }
}

/// AI manager for all non-player tanks
pub struct AiManager {
    states: HashMap<TankId, AiState>,
    difficulty: Difficulty,
}

impl AiManager {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            states: HashMap::new(),
            difficulty,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Track a tank. It makes its first decision on the next update.
    pub fn register_tank(&mut self, tank_id: TankId) {
        self.states.insert(tank_id, AiState::default());
    }

    pub fn unregister_tank(&mut self, tank_id: TankId) {
        self.states.remove(&tank_id);
    }

    pub fn get(&self, tank_id: TankId) -> Option<&AiState> {
        self.states.get(&tank_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Run one AI frame: steer, turn toward the player, and queue fire
    /// commands. Writes each AI tank's steering into `intents` (indexed
    /// like `state.tanks`). AI tanks turn their own bodies here.
    pub fn update<R: Rng>(
        &mut self,
        state: &mut GameState,
        rng: &mut R,
        dt: f32,
        intents: &mut [MovementIntent],
        fire_queue: &mut Vec<FireCommand>,
    ) {
        let params = self.difficulty.params();
        let target = state.active_player().map(|p| p.position);

        for (index, tank) in state.tanks.iter_mut().enumerate() {
            if tank.is_player || !tank.is_active() {
                continue;
            }
            let Some(ai) = self.states.get_mut(&tank.id) else {
                continue;
            };
            let intent = match intents.get_mut(index) {
                Some(intent) => intent,
                None => continue,
            };
            *intent = MovementIntent::idle_ai();

            ai.decision_timer -= dt;

            let Some(target) = target else {
                ai.behavior = AiBehavior::Idle;
                ai.direction = Vec2::ZERO;
                continue;
            };

            let (to_target, distance) = (target - tank.position).normalize_with_length();

            if ai.decision_timer <= 0.0 || ai.behavior == AiBehavior::Idle {
                ai.decision_timer = params.reaction_time
                    * (1.0 + rng.gen_range(-DECISION_JITTER..=DECISION_JITTER));
                decide_behavior(ai, distance, rng);
            }

            ai.direction = steer(ai, to_target);
            intent.direction = ai.direction;

            // Aim: body turns only when noticeably off target
            let target_angle = to_target.angle_degrees();
            let diff = shortest_angle_diff(tank.rotation, target_angle);
            if diff.abs() > TURN_THRESHOLD {
                let step = physics::ROTATION_SPEED * TURN_RATE_FACTOR * dt;
                tank.rotation = rotate_towards(tank.rotation, target_angle, step);
            }
            let diff = shortest_angle_diff(tank.rotation, target_angle);

            let weapon_ready = tank.since_last_shot > weapon::COOLDOWN * FIRE_COOLDOWN_FACTOR;
            if diff.abs() < FIRE_CONE && distance < params.engagement_range && weapon_ready {
                let chance = params.aggressiveness * params.accuracy * FIRE_CHANCE_SCALE;
                if rng.gen::<f32>() < chance {
                    fire_queue.push(FireCommand { tank_id: tank.id });
                }
            }
        }
    }
}

/// Pick the behavior band for this decision period
fn decide_behavior<R: Rng>(ai: &mut AiState, distance: f32, rng: &mut R) {
    ai.behavior = if distance > FAR_DISTANCE {
        AiBehavior::Approach
    } else if distance < NEAR_DISTANCE {
        AiBehavior::Retreat
    } else {
        AiBehavior::Strafe
    };

    match ai.behavior {
        AiBehavior::Strafe => {
            ai.strafe_sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        }
        AiBehavior::Retreat => {
            ai.retreat_jitter = rng.gen_range(-RETREAT_JITTER..=RETREAT_JITTER);
        }
        AiBehavior::Approach | AiBehavior::Idle => {}
    }
}

/// Steering direction for the current behavior, tracking the live target bearing
fn steer(ai: &AiState, to_target: Vec2) -> Vec2 {
    match ai.behavior {
        AiBehavior::Idle => Vec2::ZERO,
        AiBehavior::Approach => to_target * APPROACH_STRENGTH,
        AiBehavior::Strafe => to_target.perpendicular() * (ai.strafe_sign * STRAFE_STRENGTH),
        AiBehavior::Retreat => {
            let away = -to_target + to_target.perpendicular() * ai.retreat_jitter;
            away.normalize() * RETREAT_STRENGTH
        }
    }
}
