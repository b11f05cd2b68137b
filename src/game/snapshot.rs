//! Read-only world copies for the renderer
//!
//! Snapshots own their data; nothing a renderer does with one can reach
//! back into the simulation.

use serde::{Deserialize, Serialize};

use crate::game::constants::{powerup, weapon};
use crate::game::state::{
    EntityId, GameState, Obstacle, PowerUp, PowerUpKind, Projectile, RespawnState, Tank, TankId,
};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub kind: PowerUpKind,
    pub remaining: f32,
    pub stack_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub id: TankId,
    pub name: String,
    pub is_player: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub turret_rotation: Option<f32>,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub kills: u32,
    pub deaths: u32,
    pub effects: Vec<EffectSnapshot>,
}

impl TankSnapshot {
    pub fn from_tank(tank: &Tank) -> Self {
        Self {
            id: tank.id,
            name: tank.name.clone(),
            is_player: tank.is_player,
            position: tank.position,
            velocity: tank.velocity,
            rotation: tank.rotation,
            turret_rotation: tank.turret_rotation,
            health: tank.health,
            max_health: tank.max_health,
            shield: tank.shield,
            kills: tank.kills,
            deaths: tank.deaths,
            effects: tank
                .effects
                .iter()
                .map(|e| EffectSnapshot {
                    kind: e.kind,
                    remaining: e.remaining,
                    stack_count: e.stack_count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: EntityId,
    pub owner_id: TankId,
    pub position: Vec2,
    pub rotation: f32,
    /// Seconds until the projectile times out
    pub remaining: f32,
}

impl ProjectileSnapshot {
    pub fn from_projectile(p: &Projectile) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            position: p.position,
            rotation: p.rotation,
            remaining: (weapon::PROJECTILE_LIFETIME - p.age).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSnapshot {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub position: Vec2,
    /// Seconds until the power-up disappears uncollected
    pub remaining: f32,
}

impl PowerUpSnapshot {
    pub fn from_powerup(p: &PowerUp) -> Self {
        Self {
            id: p.id,
            kind: p.kind,
            position: p.position,
            remaining: (powerup::LIFETIME - p.age).max(0.0),
        }
    }
}

/// Out-of-play tank and its countdown, for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespawnSnapshot {
    pub tank_id: TankId,
    pub name: String,
    pub remaining: f32,
}

/// Complete render state for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub elapsed: f32,
    pub score: u32,
    pub player_kills: u32,
    pub paused: bool,
    pub game_over: bool,
    pub arena_width: f32,
    pub arena_height: f32,
    pub obstacles: Vec<Obstacle>,
    /// Active tanks only
    pub tanks: Vec<TankSnapshot>,
    pub respawning: Vec<RespawnSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub powerups: Vec<PowerUpSnapshot>,
}

impl WorldSnapshot {
    pub fn capture(state: &GameState, paused: bool, game_over: bool) -> Self {
        let respawning = state
            .tanks
            .iter()
            .filter_map(|t| match t.respawn {
                RespawnState::Respawning { remaining } => Some(RespawnSnapshot {
                    tank_id: t.id,
                    name: t.name.clone(),
                    remaining,
                }),
                RespawnState::Active => None,
            })
            .collect();

        Self {
            tick: state.tick,
            elapsed: state.elapsed,
            score: state.score,
            player_kills: state.player().map_or(0, |p| p.kills),
            paused,
            game_over,
            arena_width: state.arena.width,
            arena_height: state.arena.height,
            obstacles: state.arena.obstacles.clone(),
            tanks: state.active_tanks().map(TankSnapshot::from_tank).collect(),
            respawning,
            projectiles: state
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from_projectile)
                .collect(),
            powerups: state.powerups.iter().map(PowerUpSnapshot::from_powerup).collect(),
        }
    }

    pub fn player(&self) -> Option<&TankSnapshot> {
        self.tanks.iter().find(|t| t.is_player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Arena;

    #[test]
    fn test_respawning_tanks_omitted() {
        let mut state = GameState::new(Arena::default());
        state.add_tank("P", true, Vec2::new(100.0, 80.0));
        let bot = state.add_tank("Viper", false, Vec2::new(700.0, 520.0));
        state.get_tank_mut(bot).unwrap().eliminate();

        let snapshot = WorldSnapshot::capture(&state, false, false);

        assert_eq!(snapshot.tanks.len(), 1);
        assert!(snapshot.player().is_some());
        assert_eq!(snapshot.respawning.len(), 1);
        assert_eq!(snapshot.respawning[0].name, "Viper");
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut state = GameState::new(Arena::default());
        state.add_tank("P", true, Vec2::new(100.0, 80.0));
        let mut snapshot = WorldSnapshot::capture(&state, false, false);

        snapshot.tanks[0].health = 1.0;

        assert_eq!(state.tanks[0].health, 100.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(Arena::default());
        state.add_tank("P", true, Vec2::new(100.0, 80.0));
        state.add_powerup(PowerUpKind::RapidFire, Vec2::new(300.0, 200.0));
        let snapshot = WorldSnapshot::capture(&state, true, false);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["paused"], true);
        assert_eq!(json["powerups"][0]["kind"], "rapid_fire");
        assert_eq!(json["tanks"][0]["turret_rotation"], 0.0);
        assert_eq!(json["obstacles"].as_array().unwrap().len(), 5);
    }
}
