//! Output events for the renderer and HUD
//!
//! Systems push events during a frame; the driver drains the batch once the
//! frame is complete. Nothing in the simulation reads events back.

use serde::{Deserialize, Serialize};

use crate::game::state::{EntityId, PowerUpKind, TankId};
use crate::util::vec2::Vec2;

/// Particle effect the renderer should spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    MuzzleFlash,
    Explosion,
    WallHit,
    Elimination,
    PowerUpPickup,
    Respawn,
}

/// Discrete simulation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ParticleSpawn {
        kind: ParticleKind,
        position: Vec2,
    },
    ScreenShake {
        intensity: f32,
        duration_ms: u32,
    },
    /// Player score change
    ScoreDelta { amount: u32 },
    /// The player eliminated a tank
    Kill {
        killer_id: TankId,
        victim_id: TankId,
        victim_name: String,
    },
    /// A timed effect ran out on the player's tank
    PowerUpExpired { tank_id: TankId, kind: PowerUpKind },
    ProjectileFired {
        projectile_id: EntityId,
        owner_id: TankId,
        position: Vec2,
        rotation: f32,
    },
    /// Summed damage a tank took this frame
    TankHit {
        tank_id: TankId,
        attacker_id: TankId,
        damage: f32,
        shield_absorbed: f32,
        remaining_health: f32,
    },
    TankEliminated {
        tank_id: TankId,
        name: String,
        killer_id: Option<TankId>,
    },
    TankRespawned { tank_id: TankId, position: Vec2 },
    PowerUpSpawned {
        powerup_id: EntityId,
        kind: PowerUpKind,
        position: Vec2,
    },
    PowerUpCollected {
        powerup_id: EntityId,
        tank_id: TankId,
        kind: PowerUpKind,
    },
}

impl GameEvent {
    pub fn shake((intensity, duration_ms): (f32, u32)) -> Self {
        GameEvent::ScreenShake {
            intensity,
            duration_ms,
        }
    }

    pub fn particle(kind: ParticleKind, position: Vec2) -> Self {
        GameEvent::ParticleSpawn { kind, position }
    }
}

/// Per-frame event sink
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the pending batch, leaving the bus empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_drain() {
        let mut bus = EventBus::new();
        bus.emit(GameEvent::ScoreDelta { amount: 50 });
        bus.emit(GameEvent::shake((4.0, 200)));
        assert_eq!(bus.len(), 2);

        let batch = bus.drain();
        assert_eq!(batch.len(), 2);
        assert!(bus.is_empty());
        assert_eq!(
            batch[1],
            GameEvent::ScreenShake {
                intensity: 4.0,
                duration_ms: 200
            }
        );
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::particle(ParticleKind::MuzzleFlash, Vec2::new(1.0, 2.0));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "particle_spawn");
        assert_eq!(json["kind"], "muzzle_flash");
        assert_eq!(json["position"]["x"], 1.0);
    }
}
