//! Game state definitions and structures
//!
//! Contains all entities (tanks, projectiles, power-ups) and the arena.
//! Every field a system reads or writes lives on these records; nothing is
//! attached to an entity after construction.

use serde::{Deserialize, Serialize};

use crate::game::constants::{arena, powerup, respawn, tank, weapon};
use crate::util::angle::normalize_degrees;
use crate::util::vec2::Vec2;

/// Unique tank identifier (tanks are never destroyed, so ids are stable)
pub type TankId = u32;

/// Entity identifier for projectiles and power-ups
pub type EntityId = u64;

/// Tank lifecycle between eliminations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RespawnState {
    Active,
    /// Out of play; `remaining` seconds of simulated time until respawn
    Respawning { remaining: f32 },
}

/// Weapon readiness derived from the time since the last shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeaponState {
    Ready,
    Cooling { remaining: f32 },
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Health,
    Speed,
    Damage,
    Shield,
    RapidFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Health,
        PowerUpKind::Speed,
        PowerUpKind::Damage,
        PowerUpKind::Shield,
        PowerUpKind::RapidFire,
    ];

    /// Relative spawn weight
    pub fn spawn_weight(&self) -> u32 {
        match self {
            PowerUpKind::Health => powerup::WEIGHT_HEALTH,
            PowerUpKind::Speed => powerup::WEIGHT_SPEED,
            PowerUpKind::Damage => powerup::WEIGHT_DAMAGE,
            PowerUpKind::Shield => powerup::WEIGHT_SHIELD,
            PowerUpKind::RapidFire => powerup::WEIGHT_RAPID_FIRE,
        }
    }

    /// Effect duration in seconds (0 = instant)
    pub fn duration(&self) -> f32 {
        match self {
            PowerUpKind::Health => 0.0,
            PowerUpKind::Speed => powerup::SPEED_DURATION,
            PowerUpKind::Damage => powerup::DAMAGE_DURATION,
            PowerUpKind::Shield => powerup::SHIELD_DURATION,
            PowerUpKind::RapidFire => powerup::RAPID_FIRE_DURATION,
        }
    }

    /// Effect magnitude: heal points, multiplier, or shield points
    pub fn intensity(&self) -> f32 {
        match self {
            PowerUpKind::Health => powerup::HEAL_AMOUNT,
            PowerUpKind::Speed => powerup::SPEED_MULTIPLIER,
            PowerUpKind::Damage => powerup::DAMAGE_MULTIPLIER,
            PowerUpKind::Shield => powerup::SHIELD_AMOUNT,
            PowerUpKind::RapidFire => powerup::RAPID_FIRE_MULTIPLIER,
        }
    }
}

/// Timed modifier currently applied to a tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    /// Simulated time the effect was (last) started or refreshed
    pub started_at: f32,
    pub duration: f32,
    /// Seconds left before the effect reverts
    pub remaining: f32,
    pub intensity: f32,
    pub stack_count: u32,
}

impl ActiveEffect {
    pub fn new(kind: PowerUpKind, now: f32) -> Self {
        let duration = kind.duration();
        Self {
            kind,
            started_at: now,
            duration,
            remaining: duration,
            intensity: kind.intensity(),
            stack_count: 1,
        }
    }

    /// Restart the timer without touching the magnitude
    pub fn refresh(&mut self, now: f32) {
        self.started_at = now;
        self.remaining = self.duration;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Result of resolving damage against a tank
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    pub shield_absorbed: f32,
    pub health_lost: f32,
    /// Health reached zero on an Active tank
    pub eliminated: bool,
}

/// Tank state
///
/// Hot fields (touched every physics tick) come first, then combat fields,
/// then identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    // === HOT FIELDS ===
    pub position: Vec2,
    pub velocity: Vec2,
    /// Body rotation in degrees, [0, 360)
    pub rotation: f32,
    /// Independent turret rotation in degrees (player tank only)
    pub turret_rotation: Option<f32>,
    pub respawn: RespawnState,
    pub speed_multiplier: f32,

    // === COMBAT FIELDS ===
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub damage_multiplier: f32,
    pub cooldown_multiplier: f32,
    /// Simulated seconds since the last shot
    pub since_last_shot: f32,
    pub kills: u32,
    pub deaths: u32,
    pub effects: Vec<ActiveEffect>,

    // === IDENTITY ===
    pub id: TankId,
    pub name: String,
    pub is_player: bool,
}

impl Tank {
    pub fn new(id: TankId, name: impl Into<String>, is_player: bool, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            turret_rotation: if is_player { Some(0.0) } else { None },
            respawn: RespawnState::Active,
            speed_multiplier: 1.0,
            health: tank::MAX_HEALTH,
            max_health: tank::MAX_HEALTH,
            shield: 0.0,
            damage_multiplier: 1.0,
            cooldown_multiplier: 1.0,
            since_last_shot: f32::INFINITY,
            kills: 0,
            deaths: 0,
            effects: Vec::new(),
            id,
            name: name.into(),
            is_player,
        }
    }

    pub fn is_active(&self) -> bool {
        self.respawn == RespawnState::Active
    }

    pub fn radius(&self) -> f32 {
        tank::RADIUS
    }

    /// Effective cooldown after power-up modifiers
    pub fn weapon_cooldown(&self) -> f32 {
        weapon::COOLDOWN * self.cooldown_multiplier
    }

    pub fn weapon_state(&self) -> WeaponState {
        let cooldown = self.weapon_cooldown();
        if self.since_last_shot >= cooldown {
            WeaponState::Ready
        } else {
            WeaponState::Cooling {
                remaining: cooldown - self.since_last_shot,
            }
        }
    }

    pub fn can_fire(&self) -> bool {
        self.is_active() && self.weapon_state() == WeaponState::Ready
    }

    /// Angle projectiles leave the barrel at: turret for the player, body otherwise
    pub fn shooting_angle(&self) -> f32 {
        self.turret_rotation.unwrap_or(self.rotation)
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn set_turret_rotation(&mut self, degrees: f32) {
        if self.turret_rotation.is_some() {
            self.turret_rotation = Some(normalize_degrees(degrees));
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    /// Shield absorbs first, the remainder comes off health (floored at 0).
    /// A tank already Respawning takes no damage.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_active() || amount <= 0.0 {
            return DamageOutcome::default();
        }

        let shield_absorbed = amount.min(self.shield);
        self.shield = (self.shield - shield_absorbed).max(0.0);
        let remaining = amount - shield_absorbed;

        let before = self.health;
        self.health = (self.health - remaining).max(0.0);

        DamageOutcome {
            shield_absorbed,
            health_lost: before - self.health,
            eliminated: self.health == 0.0,
        }
    }

    /// Active -> Respawning
    pub fn eliminate(&mut self) {
        self.health = 0.0;
        self.velocity = Vec2::ZERO;
        self.deaths += 1;
        self.respawn = RespawnState::Respawning {
            remaining: respawn::DURATION,
        };
    }

    /// Respawning -> Active at `position` with full health and no momentum
    pub fn revive_at(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.health = self.max_health;
        self.respawn = RespawnState::Active;
    }
}

/// Projectile fired by a tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub owner_id: TankId,
    pub position: Vec2,
    /// Travel direction in degrees
    pub rotation: f32,
    pub speed: f32,
    pub damage: f32,
    /// Simulated time of creation
    pub created_at: f32,
    /// Simulated seconds alive
    pub age: f32,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        owner_id: TankId,
        position: Vec2,
        rotation: f32,
        damage: f32,
        created_at: f32,
    ) -> Self {
        Self {
            id,
            owner_id,
            position,
            rotation: normalize_degrees(rotation),
            speed: weapon::PROJECTILE_SPEED,
            damage,
            created_at,
            age: 0.0,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::from_degrees(self.rotation) * self.speed
    }

    pub fn radius(&self) -> f32 {
        weapon::PROJECTILE_RADIUS
    }

    pub fn is_expired(&self) -> bool {
        self.age >= weapon::PROJECTILE_LIFETIME
    }
}

/// Collectible power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub position: Vec2,
    pub created_at: f32,
    pub age: f32,
}

impl PowerUp {
    pub fn new(id: EntityId, kind: PowerUpKind, position: Vec2, created_at: f32) -> Self {
        Self {
            id,
            kind,
            position,
            created_at,
            age: 0.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= powerup::LIFETIME
    }
}

/// Axis-aligned rectangular obstacle, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Fixed play area and its static obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: arena::WIDTH,
            height: arena::HEIGHT,
            obstacles: arena::OBSTACLES
                .iter()
                .map(|&(x, y, w, h)| Obstacle::new(x, y, w, h))
                .collect(),
        }
    }
}

impl Arena {
    /// Arena of the given size with no obstacles
    pub fn open(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(width: f32, height: f32, obstacles: Vec<Obstacle>) -> Self {
        Self {
            width,
            height,
            obstacles,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameState {
    pub tick: u64,
    /// Simulated seconds since the match started (frozen while paused)
    pub elapsed: f32,
    pub arena: Arena,
    /// Ordered by id; iteration order is part of determinism
    pub tanks: Vec<Tank>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    /// Player score
    pub score: u32,
    next_entity_id: EntityId,
}

impl GameState {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            ..Default::default()
        }
    }

    /// Generate a new unique entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn get_tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.id == id)
    }

    pub fn get_tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.iter_mut().find(|t| t.id == id)
    }

    /// The player-controlled tank, whatever its respawn state
    pub fn player(&self) -> Option<&Tank> {
        self.tanks.iter().find(|t| t.is_player)
    }

    pub fn player_id(&self) -> Option<TankId> {
        self.player().map(|t| t.id)
    }

    /// The player tank only while it is Active (AI target)
    pub fn active_player(&self) -> Option<&Tank> {
        self.player().filter(|t| t.is_active())
    }

    pub fn active_tanks(&self) -> impl Iterator<Item = &Tank> {
        self.tanks.iter().filter(|t| t.is_active())
    }

    /// Add a tank, assigning the next free tank id
    pub fn add_tank(&mut self, name: impl Into<String>, is_player: bool, position: Vec2) -> TankId {
        let id = self.tanks.iter().map(|t| t.id + 1).max().unwrap_or(0);
        self.tanks.push(Tank::new(id, name, is_player, position));
        id
    }

    pub fn add_projectile(
        &mut self,
        owner_id: TankId,
        position: Vec2,
        rotation: f32,
        damage: f32,
    ) -> EntityId {
        let id = self.next_entity_id();
        let created_at = self.elapsed;
        self.projectiles
            .push(Projectile::new(id, owner_id, position, rotation, damage, created_at));
        id
    }

    pub fn add_powerup(&mut self, kind: PowerUpKind, position: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let created_at = self.elapsed;
        self.powerups
            .push(PowerUp::new(id, kind, position, created_at));
        id
    }
}
