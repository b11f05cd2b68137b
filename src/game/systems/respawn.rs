//! Respawn countdown and spawn-point selection
//!
//! `Active -> Respawning` happens only through weapon eliminations.
//! This system handles `Respawning -> Active`.

use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::debug;

use crate::game::constants::{respawn, tank};
use crate::game::events::{EventBus, GameEvent, ParticleKind};
use crate::game::state::{GameState, RespawnState, TankId};
use crate::game::systems::collision::clamp_into_arena;
use crate::util::vec2::Vec2;

/// Candidate spawn points as vectors
pub fn spawn_points() -> impl Iterator<Item = Vec2> {
    respawn::SPAWN_POINTS.iter().map(|&(x, y)| Vec2::new(x, y))
}

/// True when no Active tank other than `exclude` is within the minimum separation
pub fn is_uncontested(state: &GameState, point: Vec2, exclude: TankId) -> bool {
    let min_sq = respawn::MIN_SEPARATION * respawn::MIN_SEPARATION;
    state
        .active_tanks()
        .filter(|t| t.id != exclude)
        .all(|t| t.position.distance_sq_to(point) >= min_sq)
}

/// Pick a random uncontested spawn point, or any candidate if all are contested
pub fn select_spawn_point<R: Rng>(state: &GameState, exclude: TankId, rng: &mut R) -> Vec2 {
    let free: SmallVec<[Vec2; 6]> = spawn_points()
        .filter(|&p| is_uncontested(state, p, exclude))
        .collect();

    let point = match free.choose(rng) {
        Some(&p) => p,
        None => {
            let all: SmallVec<[Vec2; 6]> = spawn_points().collect();
            all.choose(rng).copied().unwrap_or_else(|| state.arena.center())
        }
    };

    clamp_into_arena(&state.arena, point, tank::RADIUS)
}

/// Count down Respawning tanks and bring back those whose timer ran out
pub fn update<R: Rng>(state: &mut GameState, rng: &mut R, events: &mut EventBus, dt: f32) {
    for index in 0..state.tanks.len() {
        let RespawnState::Respawning { remaining } = state.tanks[index].respawn else {
            continue;
        };

        let remaining = remaining - dt;
        if remaining > 0.0 {
            state.tanks[index].respawn = RespawnState::Respawning { remaining };
            continue;
        }

        let id = state.tanks[index].id;
        let position = select_spawn_point(state, id, rng);
        let tank = &mut state.tanks[index];
        tank.revive_at(position);
        debug!("{} respawned at ({:.0}, {:.0})", tank.name, position.x, position.y);

        events.emit(GameEvent::TankRespawned {
            tank_id: id,
            position,
        });
        events.emit(GameEvent::particle(ParticleKind::Respawn, position));
    }
}
