//! End-to-end match scenarios driven through the public API

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use tank_arena_core::game::constants::{score, tank, weapon as weapon_consts};
use tank_arena_core::game::events::EventBus;
use tank_arena_core::game::state::{Arena, GameState, RespawnState, TankId};
use tank_arena_core::game::systems::ai::FireCommand;
use tank_arena_core::game::systems::{respawn, weapon};
use tank_arena_core::util::vec2::Vec2;
use tank_arena_core::{Difficulty, GameEvent, PlayerInput, SimConfig, Simulation};

const DT: f32 = 1.0 / 60.0;

fn duel() -> (GameState, TankId, TankId) {
    let mut state = GameState::new(Arena::open(800.0, 600.0));
    let player = state.add_tank("Player", true, Vec2::new(100.0, 300.0));
    let target = state.add_tank("Storm", false, Vec2::new(250.0, 300.0));
    (state, player, target)
}

#[test]
fn player_eliminates_stationary_target() {
    let (mut state, player, target) = duel();
    let mut events = EventBus::new();
    let mut queue = Vec::new();

    let mut frames = 0;
    while state.get_tank(target).is_some_and(|t| t.is_active()) && frames < 600 {
        queue.push(FireCommand { tank_id: player });
        weapon::update(&mut state, &mut queue, &mut events, DT);
        frames += 1;
    }

    let victim = state.get_tank(target).unwrap();
    assert!(!victim.is_active());
    assert_eq!(victim.deaths, 1);
    assert_eq!(state.get_tank(player).unwrap().kills, 1);
    assert_eq!(state.score, score::KILL);

    // Four base-damage hits, one shot per cooldown
    let hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TankHit { .. }))
        .count();
    assert_eq!(hits, (tank::MAX_HEALTH / weapon_consts::BASE_DAMAGE) as usize);
    assert!(frames > 3 * (weapon_consts::COOLDOWN / DT) as usize);

    let batch = events.drain();
    assert!(batch.iter().any(|e| matches!(
        e,
        GameEvent::TankEliminated { killer_id: Some(k), .. } if *k == player
    )));
}

#[test]
fn eliminated_tank_returns_after_countdown() {
    let (mut state, _, target) = duel();
    let mut rng = Pcg32::seed_from_u64(7);
    let mut events = EventBus::new();

    state.get_tank_mut(target).unwrap().eliminate();

    for _ in 0..170 {
        respawn::update(&mut state, &mut rng, &mut events, DT);
    }
    assert!(matches!(
        state.get_tank(target).unwrap().respawn,
        RespawnState::Respawning { .. }
    ));

    for _ in 0..20 {
        respawn::update(&mut state, &mut rng, &mut events, DT);
    }
    let revived = state.get_tank(target).unwrap();
    assert!(revived.is_active());
    assert_eq!(revived.health, revived.max_health);
    assert!(respawn::spawn_points().any(|p| p == revived.position));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TankRespawned { tank_id, .. } if *tank_id == target)));
}

#[test]
fn pause_and_resume_through_timestamps() {
    let mut sim = Simulation::new(SimConfig::default());
    let ms = Duration::from_millis;

    assert!(!sim.tick(ms(0)));
    assert!(sim.tick(ms(16)));
    assert!(sim.tick(ms(32)));

    sim.toggle_pause();
    assert!(sim.snapshot().paused);
    assert!(!sim.tick(ms(48)));
    assert!(!sim.tick(ms(5_000)));
    let frozen = sim.state().elapsed;

    sim.toggle_pause();
    // Re-anchor, then step normally
    assert!(!sim.tick(ms(5_016)));
    assert!(sim.tick(ms(5_032)));

    let gained = sim.state().elapsed - frozen;
    assert!((gained - 0.016).abs() < 1e-4);
}

#[test]
fn long_match_keeps_world_consistent() {
    let mut sim = Simulation::new(SimConfig {
        difficulty: Difficulty::Hard,
        seed: 2024,
        ..Default::default()
    });
    let arena = sim.state().arena.clone();

    for _ in 0..(60 * 60) {
        sim.step(DT);
        sim.drain_events();

        let state = sim.state();
        for t in &state.tanks {
            assert!(t.health >= 0.0 && t.health <= t.max_health, "{} health {}", t.name, t.health);
            assert!(t.shield >= 0.0);
            assert!((0.0..360.0).contains(&t.rotation));
            if t.is_active() {
                assert!(t.position.x >= tank::RADIUS - 1e-3);
                assert!(t.position.x <= arena.width - tank::RADIUS + 1e-3);
                assert!(t.position.y >= tank::RADIUS - 1e-3);
                assert!(t.position.y <= arena.height - tank::RADIUS + 1e-3);
            }
        }
        for p in &state.projectiles {
            assert!(p.age < weapon_consts::PROJECTILE_LIFETIME);
        }
        assert!(state.powerups.len() <= 3);
        assert_eq!(state.score % score::POWERUP, 0);
    }

    let summary = sim.summary();
    let deaths: u32 = summary.rankings.iter().map(|r| r.deaths).sum();
    assert!(summary.total_kills <= deaths);
}

#[test]
fn same_seed_emits_same_events() {
    let run = |seed: u64| {
        let mut sim = Simulation::new(SimConfig {
            seed,
            ..Default::default()
        });
        let mut all = Vec::new();
        for frame in 0..900 {
            let input = PlayerInput::default()
                .with_aim_angle(frame as f32 * 2.0)
                .with_fire(frame % 20 == 0);
            sim.set_input(input);
            sim.step(DT);
            all.extend(sim.drain_events());
        }
        all
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn events_serialize_with_type_tag() {
    let mut sim = Simulation::with_arena(
        SimConfig {
            ai_tanks: 0,
            ..Default::default()
        },
        Arena::open(800.0, 600.0),
    );
    let player = sim.player_id();
    assert!(sim.fire(player).is_some());
    // Still cooling down
    assert!(sim.fire(player).is_none());

    let events = sim.drain_events();
    let json = serde_json::to_value(&events).unwrap();
    assert_eq!(json[0]["type"], "projectile_fired");
    assert_eq!(json[0]["owner_id"], player);
    assert_eq!(json[1]["type"], "particle_spawn");
    assert_eq!(json[1]["kind"], "muzzle_flash");
}

#[test]
fn ended_match_stops_simulating() {
    let mut sim = Simulation::new(SimConfig::default());
    for _ in 0..120 {
        sim.step(DT);
    }
    let result = sim.end_match();
    let tick = sim.state().tick;

    assert!(!sim.step(DT));
    assert!(!sim.tick(Duration::from_secs(100)));
    assert_eq!(sim.state().tick, tick);
    assert_eq!(result.rankings.len(), 4);
    assert!(result.match_duration > 1.9);
}
