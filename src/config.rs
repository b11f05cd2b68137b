use crate::game::constants::{physics, tank};
use crate::game::systems::ai::Difficulty;
use crate::game::systems::physics::{BoundaryMode, DecayMode, PhysicsSettings};

/// Upper bound on AI opponents in one match
pub const MAX_AI_TANKS: usize = 16;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("ai_tanks must be at most {max}, got {requested}")]
    TooManyTanks { requested: usize, max: usize },
    #[error("turret rotation speed must be positive and finite, got {0}")]
    InvalidTurretSpeed(f32),
    #[error("soak_frames must be at least 1")]
    ZeroSoakFrames,
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of AI opponents
    pub ai_tanks: usize,
    pub difficulty: Difficulty,
    /// Seed for the simulation RNG
    pub seed: u64,
    pub decay_mode: DecayMode,
    pub boundary_mode: BoundaryMode,
    /// Shield pickups accumulate (up to the stack cap) instead of resetting
    pub shield_stacking: bool,
    /// Player turret turn rate (degrees/s)
    pub turret_rotation_speed: f32,
    /// Frames the headless soak runner simulates
    pub soak_frames: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ai_tanks: tank::DEFAULT_AI_COUNT,
            difficulty: Difficulty::Medium,
            seed: 0x7a4b_2c1d,
            decay_mode: DecayMode::Exponential,
            boundary_mode: BoundaryMode::Bounce,
            shield_stacking: true,
            turret_rotation_speed: physics::TURRET_ROTATION_SPEED,
            soak_frames: 60 * 60 * 3,
        }
    }
}

impl SimConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from a key lookup. Invalid values are logged and
    /// the previous value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("ARENA_AI_TANKS") {
            match raw.trim().parse::<usize>() {
                Ok(parsed) if parsed <= MAX_AI_TANKS => self.ai_tanks = parsed,
                Ok(_) => tracing::warn!("ARENA_AI_TANKS must be 0-{}, using default", MAX_AI_TANKS),
                Err(_) => tracing::warn!("Invalid ARENA_AI_TANKS '{}', using default", raw),
            }
        }

        if let Some(raw) = lookup("ARENA_DIFFICULTY") {
            match raw.parse() {
                Ok(parsed) => self.difficulty = parsed,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        if let Some(raw) = lookup("ARENA_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(parsed) => self.seed = parsed,
                Err(_) => tracing::warn!("Invalid ARENA_SEED '{}', using default", raw),
            }
        }

        if let Some(raw) = lookup("ARENA_DECAY_MODE") {
            match raw.parse() {
                Ok(parsed) => self.decay_mode = parsed,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        if let Some(raw) = lookup("ARENA_BOUNDARY_MODE") {
            match raw.parse() {
                Ok(parsed) => self.boundary_mode = parsed,
                Err(e) => tracing::warn!("{}, using default", e),
            }
        }

        if let Some(raw) = lookup("ARENA_SHIELD_STACKING") {
            match parse_bool(&raw) {
                Some(parsed) => self.shield_stacking = parsed,
                None => tracing::warn!("Invalid ARENA_SHIELD_STACKING '{}', using default", raw),
            }
        }

        if let Some(raw) = lookup("ARENA_SOAK_FRAMES") {
            match raw.trim().parse::<u64>() {
                Ok(parsed) if parsed > 0 => self.soak_frames = parsed,
                Ok(_) => tracing::warn!("ARENA_SOAK_FRAMES must be > 0, using default"),
                Err(_) => tracing::warn!("Invalid ARENA_SOAK_FRAMES '{}', using default", raw),
            }
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai_tanks > MAX_AI_TANKS {
            return Err(ConfigError::TooManyTanks {
                requested: self.ai_tanks,
                max: MAX_AI_TANKS,
            });
        }
        if !self.turret_rotation_speed.is_finite() || self.turret_rotation_speed <= 0.0 {
            return Err(ConfigError::InvalidTurretSpeed(self.turret_rotation_speed));
        }
        if self.soak_frames == 0 {
            return Err(ConfigError::ZeroSoakFrames);
        }
        Ok(())
    }

    /// Movement settings handed to the physics integrator each frame
    pub fn physics(&self) -> PhysicsSettings {
        PhysicsSettings {
            decay_mode: self.decay_mode,
            boundary_mode: self.boundary_mode,
            turret_rotation_speed: self.turret_rotation_speed,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
