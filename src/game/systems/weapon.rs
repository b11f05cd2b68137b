//! Weapon system: cooldown gating, projectile advancement, hit resolution
//!
//! Per frame (after physics): tick cooldowns, advance projectiles and
//! collect tank hits, resolve summed damage per victim, then drain the
//! fire queue. Projectiles fired this frame first move on the next frame.

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::game::constants::{feedback, score, tank, weapon};
use crate::game::events::{EventBus, GameEvent, ParticleKind};
use crate::game::state::{EntityId, GameState, TankId};
use crate::game::systems::ai::FireCommand;
use crate::game::systems::collision::{
    circles_overlap, overlaps_any_obstacle, point_out_of_bounds,
};
use crate::util::vec2::Vec2;

/// One projectile striking one tank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub victim_id: TankId,
    pub owner_id: TankId,
    pub damage: f32,
}

/// Damage dealt to one victim by one owner within a frame
#[derive(Debug, Clone, Copy)]
struct Contribution {
    owner_id: TankId,
    damage: f32,
    /// Processing order of this owner's latest hit
    last_hit: usize,
}

type Contributions = SmallVec<[Contribution; 4]>;

/// Muzzle point: hull edge plus barrel, along the shooting angle
#[inline]
pub fn muzzle_point(center: Vec2, shooting_angle: f32) -> Vec2 {
    center + Vec2::from_degrees(shooting_angle) * (tank::RADIUS + tank::BARREL_LENGTH)
}

/// Fire a tank's weapon. No-op (None) while Respawning or cooling down.
pub fn fire(state: &mut GameState, tank_id: TankId, events: &mut EventBus) -> Option<EntityId> {
    let tank = state.get_tank_mut(tank_id)?;
    if !tank.can_fire() {
        return None;
    }

    let angle = tank.shooting_angle();
    let position = muzzle_point(tank.position, angle);
    let damage = weapon::BASE_DAMAGE * tank.damage_multiplier;
    tank.since_last_shot = 0.0;

    let projectile_id = state.add_projectile(tank_id, position, angle, damage);

    events.emit(GameEvent::ProjectileFired {
        projectile_id,
        owner_id: tank_id,
        position,
        rotation: angle,
    });
    events.emit(GameEvent::particle(ParticleKind::MuzzleFlash, position));

    Some(projectile_id)
}

/// Advance cooldown clocks for every tank
pub fn tick_cooldowns(state: &mut GameState, dt: f32) {
    for tank in &mut state.tanks {
        tank.since_last_shot += dt;
    }
}

/// Move every projectile and collect hits against Active tanks.
/// Expired, out-of-bounds, obstacle-struck and tank-struck projectiles are removed.
pub fn advance_projectiles(
    state: &mut GameState,
    events: &mut EventBus,
    dt: f32,
) -> SmallVec<[Hit; 8]> {
    let mut hits = SmallVec::new();
    let arena = &state.arena;
    let tanks = &state.tanks;

    state.projectiles.retain_mut(|projectile| {
        projectile.age += dt;
        if projectile.is_expired() {
            return false;
        }

        projectile.position += projectile.velocity() * dt;
        let position = projectile.position;

        if point_out_of_bounds(arena, position)
            || overlaps_any_obstacle(arena, position, projectile.radius())
        {
            events.emit(GameEvent::particle(ParticleKind::WallHit, position));
            events.emit(GameEvent::shake(feedback::WALL_HIT_SHAKE));
            return false;
        }

        // Nearest Active tank other than the owner
        let struck = tanks
            .iter()
            .filter(|t| t.is_active() && t.id != projectile.owner_id)
            .filter(|t| circles_overlap(position, projectile.radius(), t.position, t.radius()))
            .min_by(|a, b| {
                a.position
                    .distance_sq_to(position)
                    .total_cmp(&b.position.distance_sq_to(position))
            });

        match struck {
            Some(victim) => {
                hits.push(Hit {
                    victim_id: victim.id,
                    owner_id: projectile.owner_id,
                    damage: projectile.damage,
                });
                false
            }
            None => true,
        }
    });

    hits
}

/// Owner credited with a kill: highest summed damage, ties to the latest hit
fn attribute_kill(contributions: &Contributions) -> Option<TankId> {
    contributions
        .iter()
        .max_by(|a, b| {
            a.damage
                .total_cmp(&b.damage)
                .then(a.last_hit.cmp(&b.last_hit))
        })
        .map(|c| c.owner_id)
}

/// Apply this frame's hits, summed per victim, and handle eliminations
pub fn resolve_hits(state: &mut GameState, hits: &[Hit], events: &mut EventBus) {
    if hits.is_empty() {
        return;
    }

    let mut per_victim: HashMap<TankId, Contributions> = HashMap::new();
    for (order, hit) in hits.iter().enumerate() {
        let contributions = per_victim.entry(hit.victim_id).or_default();
        match contributions.iter_mut().find(|c| c.owner_id == hit.owner_id) {
            Some(c) => {
                c.damage += hit.damage;
                c.last_hit = order;
            }
            None => contributions.push(Contribution {
                owner_id: hit.owner_id,
                damage: hit.damage,
                last_hit: order,
            }),
        }
    }

    let player_id = state.player_id();

    // Tank order keeps resolution deterministic
    for index in 0..state.tanks.len() {
        let Some(contributions) = per_victim.get(&state.tanks[index].id) else {
            continue;
        };
        let total: f32 = contributions.iter().map(|c| c.damage).sum();
        let Some(attacker_id) = attribute_kill(contributions) else {
            continue;
        };

        let victim = &mut state.tanks[index];
        let outcome = victim.apply_damage(total);
        let victim_id = victim.id;
        let victim_position = victim.position;

        events.emit(GameEvent::TankHit {
            tank_id: victim_id,
            attacker_id,
            damage: total,
            shield_absorbed: outcome.shield_absorbed,
            remaining_health: victim.health,
        });

        if !outcome.eliminated {
            events.emit(GameEvent::particle(ParticleKind::Explosion, victim_position));
            events.emit(GameEvent::shake(feedback::TANK_HIT_SHAKE));
            continue;
        }

        victim.eliminate();
        let victim_name = victim.name.clone();
        debug!("{} eliminated by tank {}", victim_name, attacker_id);

        if let Some(killer) = state.get_tank_mut(attacker_id) {
            killer.kills += 1;
        }

        if Some(attacker_id) == player_id {
            state.score += score::KILL;
            events.emit(GameEvent::ScoreDelta { amount: score::KILL });
            events.emit(GameEvent::Kill {
                killer_id: attacker_id,
                victim_id,
                victim_name: victim_name.clone(),
            });
        }

        events.emit(GameEvent::TankEliminated {
            tank_id: victim_id,
            name: victim_name,
            killer_id: Some(attacker_id),
        });
        events.emit(GameEvent::particle(ParticleKind::Elimination, victim_position));
        events.emit(GameEvent::shake(feedback::ELIMINATION_SHAKE));
    }
}

/// Fire every queued command, in queue order
pub fn drain_fire_queue(
    state: &mut GameState,
    queue: &mut Vec<FireCommand>,
    events: &mut EventBus,
) -> usize {
    queue
        .drain(..)
        .filter(|cmd| fire(state, cmd.tank_id, events).is_some())
        .count()
}

/// Weapon phase of a frame
pub fn update(state: &mut GameState, queue: &mut Vec<FireCommand>, events: &mut EventBus, dt: f32) {
    tick_cooldowns(state, dt);
    let hits = advance_projectiles(state, events, dt);
    resolve_hits(state, &hits, events);
    drain_fire_queue(state, queue, events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Arena, RespawnState};

    fn open_state() -> GameState {
        GameState::new(Arena::open(800.0, 600.0))
    }

    #[test]
    fn test_muzzle_and_travel() {
        let mut state = open_state();
        let id = state.add_tank("P", true, Vec2::new(100.0, 100.0));
        let mut events = EventBus::new();

        let projectile_id = fire(&mut state, id, &mut events).unwrap();

        let p = &state.projectiles[0];
        assert_eq!(p.id, projectile_id);
        assert!(p.position.approx_eq(Vec2::new(139.0, 100.0), 1e-4));
        assert_eq!(p.rotation, 0.0);
        assert_eq!(p.speed, 450.0);
        assert_eq!(p.damage, weapon::BASE_DAMAGE);

        advance_projectiles(&mut state, &mut events, 0.1);
        assert!((state.projectiles[0].position.x - 184.0).abs() < 1e-3);
    }

    #[test]
    fn test_fire_uses_turret_for_player_body_for_ai() {
        let mut state = open_state();
        let player = state.add_tank("P", true, Vec2::new(400.0, 300.0));
        let bot = state.add_tank("B", false, Vec2::new(200.0, 300.0));
        state.tanks[0].rotation = 0.0;
        state.tanks[0].turret_rotation = Some(90.0);
        state.tanks[1].rotation = 180.0;
        let mut events = EventBus::new();

        fire(&mut state, player, &mut events);
        fire(&mut state, bot, &mut events);

        assert!(state.projectiles[0].position.approx_eq(Vec2::new(400.0, 339.0), 1e-3));
        assert!(state.projectiles[1].position.approx_eq(Vec2::new(161.0, 300.0), 1e-3));
    }

    #[test]
    fn test_double_fire_within_cooldown() {
        let mut state = open_state();
        let id = state.add_tank("P", true, Vec2::new(100.0, 100.0));
        let mut events = EventBus::new();

        assert!(fire(&mut state, id, &mut events).is_some());
        tick_cooldowns(&mut state, 0.1);
        assert!(fire(&mut state, id, &mut events).is_none());
        assert_eq!(state.projectiles.len(), 1);

        tick_cooldowns(&mut state, weapon::COOLDOWN);
        assert!(fire(&mut state, id, &mut events).is_some());
    }

    #[test]
    fn test_damage_multiplier_applied() {
        let mut state = open_state();
        let id = state.add_tank("P", true, Vec2::new(100.0, 100.0));
        state.tanks[0].damage_multiplier = 1.8;
        let mut events = EventBus::new();

        fire(&mut state, id, &mut events);

        assert!((state.projectiles[0].damage - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_respawning_tank_cannot_fire() {
        let mut state = open_state();
        let id = state.add_tank("P", true, Vec2::new(100.0, 100.0));
        state.tanks[0].eliminate();
        let mut events = EventBus::new();

        assert!(fire(&mut state, id, &mut events).is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn test_projectile_lifetime_bound() {
        let mut state = open_state();
        state.add_projectile(0, Vec2::new(10.0, 10.0), 0.0, 25.0);
        state.projectiles[0].speed = 0.0;
        let mut events = EventBus::new();

        let mut frames = 0;
        while !state.projectiles.is_empty() {
            advance_projectiles(&mut state, &mut events, 1.0 / 60.0);
            for p in &state.projectiles {
                assert!(p.age < weapon::PROJECTILE_LIFETIME);
            }
            frames += 1;
            assert!(frames <= 182);
        }
        // Expiry is silent
        assert!(events.is_empty());
    }

    #[test]
    fn test_boundary_exit_destroys_projectile() {
        let mut state = open_state();
        state.add_projectile(0, Vec2::new(795.0, 300.0), 0.0, 25.0);
        let mut events = EventBus::new();

        advance_projectiles(&mut state, &mut events, 0.1);

        assert!(state.projectiles.is_empty());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ParticleSpawn { kind: ParticleKind::WallHit, .. })));
    }

    #[test]
    fn test_obstacle_destroys_projectile() {
        let mut state = GameState::new(Arena::default());
        // Heading right into the center block at 360..440
        state.add_projectile(0, Vec2::new(340.0, 300.0), 0.0, 25.0);
        let mut events = EventBus::new();

        advance_projectiles(&mut state, &mut events, 0.1);

        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_ignores_owner() {
        let mut state = open_state();
        let owner = state.add_tank("P", true, Vec2::new(100.0, 100.0));
        state.add_projectile(owner, Vec2::new(95.0, 100.0), 0.0, 25.0);
        let mut events = EventBus::new();

        let hits = advance_projectiles(&mut state, &mut events, 0.01);

        assert!(hits.is_empty());
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_hit_applies_shield_then_health() {
        let mut state = open_state();
        let shooter = state.add_tank("P", true, Vec2::new(100.0, 300.0));
        let target = state.add_tank("B", false, Vec2::new(200.0, 300.0));
        state.tanks[1].shield = 10.0;
        state.add_projectile(shooter, Vec2::new(180.0, 300.0), 0.0, 25.0);
        let mut events = EventBus::new();

        let hits = advance_projectiles(&mut state, &mut events, 0.02);
        assert_eq!(hits.len(), 1);
        resolve_hits(&mut state, &hits, &mut events);

        let victim = state.get_tank(target).unwrap();
        assert_eq!(victim.shield, 0.0);
        assert_eq!(victim.health, 85.0);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::TankHit { shield_absorbed, .. } if *shield_absorbed == 10.0
        )));
    }

    #[test]
    fn test_multi_hit_damage_summed() {
        let mut state = open_state();
        let player = state.add_tank("P", true, Vec2::new(100.0, 300.0));
        let bot = state.add_tank("B", false, Vec2::new(500.0, 300.0));
        let victim = state.add_tank("V", false, Vec2::new(300.0, 300.0));
        let mut events = EventBus::new();

        let hits = [
            Hit { victim_id: victim, owner_id: player, damage: 25.0 },
            Hit { victim_id: victim, owner_id: bot, damage: 25.0 },
        ];
        resolve_hits(&mut state, &hits, &mut events);

        assert_eq!(state.get_tank(victim).unwrap().health, 50.0);
        let hit_events = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TankHit { .. }))
            .count();
        assert_eq!(hit_events, 1);
    }

    #[test]
    fn test_kill_attribution_highest_damage_then_latest() {
        let mut state = open_state();
        let player = state.add_tank("P", true, Vec2::new(100.0, 300.0));
        let bot = state.add_tank("B", false, Vec2::new(500.0, 300.0));
        let victim = state.add_tank("V", false, Vec2::new(300.0, 300.0));
        state.tanks[2].health = 40.0;
        let mut events = EventBus::new();

        // Tie at 25 each; bot hit last
        let hits = [
            Hit { victim_id: victim, owner_id: player, damage: 25.0 },
            Hit { victim_id: victim, owner_id: bot, damage: 25.0 },
        ];
        resolve_hits(&mut state, &hits, &mut events);

        assert_eq!(state.get_tank(bot).unwrap().kills, 1);
        assert_eq!(state.get_tank(player).unwrap().kills, 0);
        assert_eq!(state.score, 0);

        // Player outdamages the bot
        state.get_tank_mut(victim).unwrap().revive_at(Vec2::new(300.0, 300.0));
        state.tanks[2].health = 40.0;
        let hits = [
            Hit { victim_id: victim, owner_id: bot, damage: 25.0 },
            Hit { victim_id: victim, owner_id: player, damage: 45.0 },
            Hit { victim_id: victim, owner_id: bot, damage: 10.0 },
        ];
        resolve_hits(&mut state, &hits, &mut events);
        assert_eq!(state.get_tank(player).unwrap().kills, 1);
    }

    #[test]
    fn test_player_kill_scores_and_respawns_victim() {
        let mut state = open_state();
        let player = state.add_tank("P", true, Vec2::new(100.0, 300.0));
        let victim = state.add_tank("Storm", false, Vec2::new(300.0, 300.0));
        state.tanks[1].health = 20.0;
        state.tanks[1].velocity = Vec2::new(40.0, 0.0);
        let mut events = EventBus::new();

        let hits = [Hit { victim_id: victim, owner_id: player, damage: 25.0 }];
        resolve_hits(&mut state, &hits, &mut events);

        let v = state.get_tank(victim).unwrap();
        assert_eq!(v.health, 0.0);
        assert_eq!(v.velocity, Vec2::ZERO);
        assert_eq!(v.deaths, 1);
        assert_eq!(v.respawn, RespawnState::Respawning { remaining: 3.0 });
        assert_eq!(state.score, score::KILL);
        assert_eq!(state.get_tank(player).unwrap().kills, 1);

        let batch = events.drain();
        assert!(batch.contains(&GameEvent::ScoreDelta { amount: score::KILL }));
        assert!(batch.iter().any(|e| matches!(
            e,
            GameEvent::Kill { victim_name, .. } if victim_name == "Storm"
        )));
    }

    #[test]
    fn test_projectiles_skip_respawning_tanks() {
        let mut state = open_state();
        let shooter = state.add_tank("P", true, Vec2::new(100.0, 300.0));
        state.add_tank("B", false, Vec2::new(200.0, 300.0));
        state.tanks[1].eliminate();
        state.add_projectile(shooter, Vec2::new(195.0, 300.0), 0.0, 25.0);
        let mut events = EventBus::new();

        let hits = advance_projectiles(&mut state, &mut events, 0.01);

        assert!(hits.is_empty());
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_update_drains_queue_after_hits() {
        let mut state = open_state();
        let id = state.add_tank("P", true, Vec2::new(100.0, 100.0));
        let mut queue = vec![FireCommand { tank_id: id }, FireCommand { tank_id: id }];
        let mut events = EventBus::new();

        update(&mut state, &mut queue, &mut events, 1.0 / 60.0);

        assert!(queue.is_empty());
        assert_eq!(state.projectiles.len(), 1);
        // Fired this frame, not yet advanced
        assert!(state.projectiles[0].position.approx_eq(Vec2::new(139.0, 100.0), 1e-4));
    }
}
