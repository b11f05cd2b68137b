//! Frame driver
//!
//! Owns the world, the RNG, the fire queue and every system, and runs the
//! fixed per-frame order: AI, physics, respawn, weapons, power-ups.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::game::clock::SimulationClock;
use crate::game::constants::{physics as physics_consts, tank};
use crate::game::events::{EventBus, GameEvent};
use crate::game::input::PlayerInput;
use crate::game::match_result::{summarize, MatchResult};
use crate::game::snapshot::WorldSnapshot;
use crate::game::spatial::TankGrid;
use crate::game::state::{Arena, EntityId, GameState, TankId};
use crate::game::systems::ai::{AiManager, FireCommand};
use crate::game::systems::physics::{self, MovementIntent, PhysicsReport};
use crate::game::systems::powerup::PowerUpSystem;
use crate::game::systems::{collision, respawn, weapon};
use crate::util::vec2::Vec2;

/// One match: world state plus the systems that advance it
pub struct Simulation {
    state: GameState,
    config: SimConfig,
    clock: SimulationClock,
    ai: AiManager,
    powerups: PowerUpSystem,
    grid: TankGrid,
    rng: Pcg32,
    events: EventBus,
    fire_queue: Vec<FireCommand>,
    intents: Vec<MovementIntent>,
    input: PlayerInput,
    player_id: TankId,
    last_physics: PhysicsReport,
}

/// Name for the n-th AI tank; the name list cycles with a numeric suffix
fn ai_name(index: usize) -> String {
    let names = tank::AI_NAMES;
    let base = names[index % names.len()];
    match index / names.len() {
        0 => base.to_string(),
        round => format!("{}-{}", base, round + 1),
    }
}

/// Fresh world for a match, with every AI tank registered
fn populate(config: &SimConfig, arena: Arena) -> (GameState, AiManager, TankId) {
    let mut state = GameState::new(arena);
    let spawn_points: Vec<Vec2> = respawn::spawn_points().collect();
    let spawn_at = |i: usize, arena: &Arena| {
        let p = spawn_points[i % spawn_points.len()];
        collision::clamp_into_arena(arena, p, tank::RADIUS)
    };

    let position = spawn_at(0, &state.arena);
    let player_id = state.add_tank("Player", true, position);

    let mut ai = AiManager::new(config.difficulty);
    for i in 0..config.ai_tanks {
        let position = spawn_at(i + 1, &state.arena);
        let id = state.add_tank(ai_name(i), false, position);
        ai.register_tank(id);
    }

    info!(
        "Match started: {} AI tanks, {:?} difficulty, seed {}",
        config.ai_tanks, config.difficulty, config.seed
    );

    (state, ai, player_id)
}

impl Simulation {
    /// Start a match in the default arena
    pub fn new(config: SimConfig) -> Self {
        Self::with_arena(config, Arena::default())
    }

    /// Start a match: one player tank plus `config.ai_tanks` AI tanks,
    /// placed on the spawn points in order
    pub fn with_arena(config: SimConfig, arena: Arena) -> Self {
        let (state, ai, player_id) = populate(&config, arena);

        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            powerups: PowerUpSystem::new(config.shield_stacking),
            intents: Vec::with_capacity(state.tanks.len()),
            state,
            clock: SimulationClock::new(),
            ai,
            grid: TankGrid::default(),
            events: EventBus::new(),
            fire_queue: Vec::new(),
            input: PlayerInput::default(),
            player_id,
            config,
            last_physics: PhysicsReport::default(),
        }
    }

    /// Start over in the same arena with the same config. Clears game over
    /// and pause, reseeds the RNG and drops pending events and input.
    pub fn reset(&mut self) {
        let arena = self.state.arena.clone();
        let (state, ai, player_id) = populate(&self.config, arena);
        self.state = state;
        self.ai = ai;
        self.player_id = player_id;

        self.clock.reset();
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.powerups = PowerUpSystem::new(self.config.shield_stacking);
        self.events.drain();
        self.fire_queue.clear();
        self.input = PlayerInput::default();
        self.last_physics = PhysicsReport::default();
    }

    /// Latest input snapshot for the player tank. The fire trigger is
    /// consumed by the next step.
    pub fn set_input(&mut self, input: PlayerInput) {
        self.input = input;
    }

    /// Advance using a monotonic timestamp. Returns true if a step ran.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.clock.tick(now) {
            Some(dt) => self.step(dt),
            None => false,
        }
    }

    /// Advance one frame by `dt` seconds (capped at the maximum step).
    /// Returns false without touching the world while paused, after the
    /// match ended, or for a non-positive delta.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.clock.is_paused() || self.clock.is_game_over() {
            return false;
        }
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        let dt = dt.min(physics_consts::MAX_DT);

        self.state.tick += 1;
        self.state.elapsed += dt;

        // Intents: player from input, AI filled in by the controller
        self.intents.clear();
        for t in &self.state.tanks {
            let intent = if t.is_player {
                MovementIntent {
                    direction: self.input.movement_direction(),
                    turret_target: self.input.aim_angle(t.position),
                    follow_heading: true,
                }
            } else {
                MovementIntent::idle_ai()
            };
            self.intents.push(intent);
        }

        if self.input.fire {
            self.fire_queue.push(FireCommand {
                tank_id: self.player_id,
            });
            self.input.fire = false;
        }

        self.ai.update(
            &mut self.state,
            &mut self.rng,
            dt,
            &mut self.intents,
            &mut self.fire_queue,
        );

        self.last_physics = physics::update(
            &mut self.state,
            &self.intents,
            &self.config.physics(),
            &mut self.grid,
            dt,
        );
        if self.last_physics.wall_hits > 0 || self.last_physics.tank_contacts > 0 {
            debug!(
                "Tick {}: {} wall hits, {} tank contacts",
                self.state.tick, self.last_physics.wall_hits, self.last_physics.tank_contacts
            );
        }

        respawn::update(&mut self.state, &mut self.rng, &mut self.events, dt);
        weapon::update(&mut self.state, &mut self.fire_queue, &mut self.events, dt);
        self.powerups
            .update(&mut self.state, &mut self.rng, &mut self.events, dt);

        true
    }

    /// Fire a tank's weapon immediately, outside the frame queue
    pub fn fire(&mut self, tank_id: TankId) -> Option<EntityId> {
        weapon::fire(&mut self.state, tank_id, &mut self.events)
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Latch game over. Further ticks and steps do nothing.
    pub fn end_match(&mut self) -> MatchResult {
        self.clock.set_game_over();
        let result = summarize(&self.state);
        info!(
            "Match ended after {:.1}s: score {}, {} kills",
            result.match_duration, result.player_score, result.player_kills
        );
        result
    }

    pub fn is_game_over(&self) -> bool {
        self.clock.is_game_over()
    }

    /// Pending events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.state, self.is_paused(), self.is_game_over())
    }

    pub fn summary(&self) -> MatchResult {
        summarize(&self.state)
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn player_kills(&self) -> u32 {
        self.state.get_tank(self.player_id).map_or(0, |p| p.kills)
    }

    pub fn player_id(&self) -> TankId {
        self.player_id
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct world access for scenario setup
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ai(&self) -> &AiManager {
        &self.ai
    }

    /// Contacts resolved by physics in the latest step
    pub fn physics_report(&self) -> PhysicsReport {
        self.last_physics
    }

    /// Seconds between power-up spawns remaining
    pub fn powerup_timer(&self) -> f32 {
        self.powerups.spawn_timer()
    }
}
