use std::time::Duration;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tank_arena_core::{GameEvent, PlayerInput, SimConfig, Simulation};

/// Soak frame period (60 Hz)
const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Frames between progress lines
const REPORT_INTERVAL: u64 = 60 * 30;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Tank Arena soak runner v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: ai_tanks={}, difficulty={:?}, seed={}, frames={}",
        config.ai_tanks, config.difficulty, config.seed, config.soak_frames
    );

    let frames = config.soak_frames;
    let mut sim = Simulation::new(config);

    // Player stands still; the AI tanks do the fighting
    sim.set_input(PlayerInput::default());

    let mut now = Duration::ZERO;
    let mut eliminations = 0u64;
    let mut steps = 0u64;

    // Anchor the clock
    sim.tick(now);

    for frame in 1..=frames {
        now += FRAME;
        if sim.tick(now) {
            steps += 1;
        }

        for event in sim.drain_events() {
            if let GameEvent::TankEliminated { name, killer_id, .. } = event {
                eliminations += 1;
                let killer = killer_id
                    .and_then(|id| sim.state().get_tank(id))
                    .map_or("unknown", |t| t.name.as_str());
                info!("{} eliminated by {}", name, killer);
            }
        }

        if frame % REPORT_INTERVAL == 0 {
            let snapshot = sim.snapshot();
            info!(
                "Frame {}: {} active tanks, {} projectiles, {} power-ups, {} eliminations",
                frame,
                snapshot.tanks.len(),
                snapshot.projectiles.len(),
                snapshot.powerups.len(),
                eliminations
            );
        }
    }

    let result = sim.end_match();
    info!(
        "Soak finished: {} steps, {:.1}s simulated, {} total kills",
        steps, result.match_duration, result.total_kills
    );
    for ranking in &result.rankings {
        info!(
            "#{} {} - {} kills, {} deaths",
            ranking.rank, ranking.name, ranking.kills, ranking.deaths
        );
    }

    debug!("Final snapshot: {}", serde_json::to_string(&sim.snapshot())?);

    Ok(())
}
