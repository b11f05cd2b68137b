//! Tank Arena Core
//!
//! Deterministic simulation for a top-down 2D tank arena: one player tank
//! against AI tanks, with projectiles, obstacles, respawns and power-ups.
//! Rendering, audio and input capture live outside the crate; they drive a
//! [`Simulation`] with timestamps and [`PlayerInput`], then read back a
//! [`WorldSnapshot`] and the drained [`GameEvent`]s.

pub mod config;
pub mod game;
pub mod util;

pub use config::{ConfigError, SimConfig};
pub use game::events::{GameEvent, ParticleKind};
pub use game::game_loop::Simulation;
pub use game::input::{Aim, HeldDirections, PlayerInput};
pub use game::match_result::MatchResult;
pub use game::snapshot::WorldSnapshot;
pub use game::systems::ai::Difficulty;
