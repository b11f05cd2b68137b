//! Power-up spawning, collection, effect application and expiry

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use smallvec::SmallVec;
use tracing::debug;

use crate::game::constants::{powerup, score};
use crate::game::events::{EventBus, GameEvent, ParticleKind};
use crate::game::state::{ActiveEffect, Arena, GameState, PowerUpKind, Tank};
use crate::game::systems::collision::overlaps_any_obstacle;
use crate::util::vec2::Vec2;

/// Pick a power-up kind by spawn weight
pub fn choose_kind<R: Rng>(rng: &mut R) -> PowerUpKind {
    match WeightedIndex::new(PowerUpKind::ALL.iter().map(|k| k.spawn_weight())) {
        Ok(dist) => PowerUpKind::ALL[dist.sample(rng)],
        Err(_) => PowerUpKind::Health,
    }
}

/// Random position in the spawn area clear of obstacles, if one is found
pub fn find_spawn_position<R: Rng>(arena: &Arena, rng: &mut R) -> Option<Vec2> {
    let (min_x, max_x) = (powerup::SPAWN_X.0, powerup::SPAWN_X.1.min(arena.width));
    let (min_y, max_y) = (powerup::SPAWN_Y.0, powerup::SPAWN_Y.1.min(arena.height));
    if min_x >= max_x || min_y >= max_y {
        return None;
    }

    (0..powerup::MAX_SPAWN_ATTEMPTS)
        .map(|_| Vec2::new(rng.gen_range(min_x..max_x), rng.gen_range(min_y..max_y)))
        .find(|&p| !overlaps_any_obstacle(arena, p, powerup::SPAWN_CLEARANCE))
}

/// Apply a collected power-up to a tank
pub fn apply_effect(tank: &mut Tank, kind: PowerUpKind, now: f32, shield_stacking: bool) {
    if kind == PowerUpKind::Health {
        tank.heal(powerup::HEAL_AMOUNT);
        return;
    }

    let existing = tank.effects.iter().position(|e| e.kind == kind);

    match kind {
        PowerUpKind::Speed => tank.speed_multiplier = powerup::SPEED_MULTIPLIER,
        PowerUpKind::Damage => tank.damage_multiplier = powerup::DAMAGE_MULTIPLIER,
        PowerUpKind::RapidFire => tank.cooldown_multiplier = powerup::RAPID_FIRE_MULTIPLIER,
        PowerUpKind::Shield => {
            let cap = powerup::SHIELD_AMOUNT * powerup::MAX_SHIELD_STACKS as f32;
            tank.shield = if shield_stacking && existing.is_some() {
                (tank.shield + powerup::SHIELD_AMOUNT).min(cap)
            } else {
                powerup::SHIELD_AMOUNT
            };
        }
        PowerUpKind::Health => {}
    }

    match existing {
        Some(index) => {
            let effect = &mut tank.effects[index];
            effect.refresh(now);
            if kind == PowerUpKind::Shield && shield_stacking {
                effect.stack_count = (effect.stack_count + 1).min(powerup::MAX_SHIELD_STACKS);
            }
        }
        None => tank.effects.push(ActiveEffect::new(kind, now)),
    }
}

/// Put a tank modifier back to neutral
fn revert_effect(tank: &mut Tank, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Speed => tank.speed_multiplier = 1.0,
        PowerUpKind::Damage => tank.damage_multiplier = 1.0,
        PowerUpKind::RapidFire => tank.cooldown_multiplier = 1.0,
        PowerUpKind::Shield => tank.shield = 0.0,
        PowerUpKind::Health => {}
    }
}

/// Count down active effects and revert the expired ones
pub fn expire_effects(state: &mut GameState, events: &mut EventBus, dt: f32) {
    for tank in &mut state.tanks {
        if tank.effects.is_empty() {
            continue;
        }

        let mut expired: SmallVec<[PowerUpKind; 4]> = SmallVec::new();
        tank.effects.retain_mut(|effect| {
            effect.remaining -= dt;
            if effect.is_expired() {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });

        for kind in expired {
            revert_effect(tank, kind);
            if tank.is_player {
                events.emit(GameEvent::PowerUpExpired {
                    tank_id: tank.id,
                    kind,
                });
            }
        }
    }
}

/// Power-up spawning and collection
pub struct PowerUpSystem {
    /// Seconds until the next spawn attempt
    spawn_timer: f32,
    shield_stacking: bool,
}

impl PowerUpSystem {
    pub fn new(shield_stacking: bool) -> Self {
        Self {
            spawn_timer: powerup::SPAWN_INTERVAL,
            shield_stacking,
        }
    }

    pub fn shield_stacking(&self) -> bool {
        self.shield_stacking
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Power-up phase of a frame
    pub fn update<R: Rng>(
        &mut self,
        state: &mut GameState,
        rng: &mut R,
        events: &mut EventBus,
        dt: f32,
    ) {
        self.tick_spawn(state, rng, events, dt);

        for p in &mut state.powerups {
            p.age += dt;
        }
        state.powerups.retain(|p| !p.is_expired());

        self.collect(state, events);
        expire_effects(state, events, dt);
    }

    /// The timer only re-arms on a successful spawn. While the live cap is
    /// reached or no clear spot turns up it holds at zero, so a freed slot
    /// is filled on the next frame.
    fn tick_spawn<R: Rng>(
        &mut self,
        state: &mut GameState,
        rng: &mut R,
        events: &mut EventBus,
        dt: f32,
    ) {
        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return;
        }
        self.spawn_timer = 0.0;

        if state.powerups.len() >= powerup::MAX_LIVE {
            return;
        }

        let kind = choose_kind(rng);
        let Some(position) = find_spawn_position(&state.arena, rng) else {
            debug!("No clear position for {:?} power-up", kind);
            return;
        };
        self.spawn_timer = powerup::SPAWN_INTERVAL;

        let powerup_id = state.add_powerup(kind, position);
        debug!("Spawned {:?} power-up at ({:.0}, {:.0})", kind, position.x, position.y);
        events.emit(GameEvent::PowerUpSpawned {
            powerup_id,
            kind,
            position,
        });
    }

    /// Any Active tank within the collection radius consumes a power-up;
    /// the nearest one wins.
    fn collect(&self, state: &mut GameState, events: &mut EventBus) {
        let radius_sq = powerup::COLLECTION_RADIUS * powerup::COLLECTION_RADIUS;
        let now = state.elapsed;
        let mut index = 0;

        while index < state.powerups.len() {
            let pickup = &state.powerups[index];
            let collector = state
                .tanks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.is_active())
                .map(|(i, t)| (i, t.position.distance_sq_to(pickup.position)))
                .filter(|&(_, d)| d <= radius_sq)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i);

            let Some(tank_index) = collector else {
                index += 1;
                continue;
            };

            let pickup = state.powerups.remove(index);
            let tank = &mut state.tanks[tank_index];
            apply_effect(tank, pickup.kind, now, self.shield_stacking);

            events.emit(GameEvent::PowerUpCollected {
                powerup_id: pickup.id,
                tank_id: tank.id,
                kind: pickup.kind,
            });
            events.emit(GameEvent::particle(ParticleKind::PowerUpPickup, pickup.position));

            if tank.is_player {
                state.score += score::POWERUP;
                events.emit(GameEvent::ScoreDelta {
                    amount: score::POWERUP,
                });
            }
        }
    }
}

impl Default for PowerUpSystem {
    fn default() -> Self {
        Self::new(true)
    }
}
