/// Arena geometry
pub mod arena {
    /// Arena width in pixels
    pub const WIDTH: f32 = 800.0;
    /// Arena height in pixels
    pub const HEIGHT: f32 = 600.0;
    /// Default obstacle layout as (x, y, width, height), top-left anchored
    pub const OBSTACLES: [(f32, f32, f32, f32); 5] = [
        (100.0, 100.0, 60.0, 60.0),
        (640.0, 440.0, 80.0, 60.0),
        (360.0, 260.0, 80.0, 80.0),
        (150.0, 400.0, 60.0, 40.0),
        (590.0, 150.0, 40.0, 80.0),
    ];
}

/// Tank body constants
pub mod tank {
    /// Collision radius (center to hull edge)
    pub const RADIUS: f32 = 12.0;
    /// Collision diameter, used for tank-tank overlap
    pub const DIAMETER: f32 = RADIUS * 2.0;
    /// Distance from hull edge to barrel tip
    pub const BARREL_LENGTH: f32 = 27.0;
    /// Health every tank starts (and respawns) with
    pub const MAX_HEALTH: f32 = 100.0;
    /// Number of AI opponents in a default match
    pub const DEFAULT_AI_COUNT: usize = 3;
    /// Names handed out to AI tanks in creation order
    pub const AI_NAMES: [&str; 6] = ["Alpha-7", "Storm", "Viper", "Raptor", "Onyx", "Bastion"];
}

/// Movement integration constants
/// Applied as: velocity += intent * ACCELERATION * speed_multiplier * dt
pub mod physics {
    /// Maximum speed at a speed multiplier of 1.0 (px/s)
    pub const MAX_SPEED: f32 = 200.0;
    /// Acceleration under full input (px/s²)
    pub const ACCELERATION: f32 = 600.0;
    /// Exponential decay rate when no input is held (1/s)
    /// Applied as: velocity *= exp(-DECAY_RATE * dt)
    pub const DECAY_RATE: f32 = 8.0;
    /// Linear deceleration when no input is held (px/s²)
    pub const LINEAR_DECELERATION: f32 = 800.0;
    /// Speeds below this snap to zero, and body rotation only follows
    /// the velocity heading above it (px/s)
    pub const VELOCITY_THRESHOLD: f32 = 5.0;
    /// Body turn rate (degrees/s)
    pub const ROTATION_SPEED: f32 = 180.0;
    /// Player turret turn rate (degrees/s)
    pub const TURRET_ROTATION_SPEED: f32 = 540.0;
    /// Velocity kept (and reflected) on an arena-wall hit
    pub const BOUNDARY_RESTITUTION: f32 = 0.3;
    /// Velocity kept (and reflected) when both axes are blocked by an obstacle
    pub const OBSTACLE_RESTITUTION: f32 = 0.2;
    /// Coefficient of restitution for tank-tank impulses
    pub const TANK_RESTITUTION: f32 = 0.4;
    /// Largest simulated step a single frame may take (seconds)
    pub const MAX_DT: f32 = 1.0 / 30.0;
    /// Frame deltas shorter than this are skipped (seconds)
    pub const MIN_DT: f32 = 0.005;
}

/// Weapon and projectile constants
pub mod weapon {
    /// Base time between shots (seconds)
    pub const COOLDOWN: f32 = 0.35;
    /// Damage of a projectile at damage multiplier 1.0
    pub const BASE_DAMAGE: f32 = 25.0;
    /// Projectile travel speed (px/s)
    pub const PROJECTILE_SPEED: f32 = 450.0;
    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 2.5;
    /// Projectile lifetime (seconds)
    pub const PROJECTILE_LIFETIME: f32 = 3.0;
}

/// Feedback (particle / screen shake) constants for the renderer
pub mod feedback {
    /// Screen shake for a projectile striking a wall or obstacle
    pub const WALL_HIT_SHAKE: (f32, u32) = (4.0, 200);
    /// Screen shake for a projectile striking a tank
    pub const TANK_HIT_SHAKE: (f32, u32) = (6.0, 300);
    /// Screen shake for an elimination
    pub const ELIMINATION_SHAKE: (f32, u32) = (10.0, 500);
}

/// Score awards for the player
pub mod score {
    /// Awarded when the player eliminates a tank
    pub const KILL: u32 = 100;
    /// Awarded when the player collects a power-up
    pub const POWERUP: u32 = 50;
}

/// Respawn constants
pub mod respawn {
    /// Time spent in the Respawning state (seconds)
    pub const DURATION: f32 = 3.0;
    /// Minimum distance from any Active tank for a spawn point to count as free
    pub const MIN_SEPARATION: f32 = 100.0;
    /// Candidate spawn points, clear of the default obstacle layout
    pub const SPAWN_POINTS: [(f32, f32); 6] = [
        (100.0, 80.0),
        (700.0, 520.0),
        (80.0, 300.0),
        (720.0, 300.0),
        (400.0, 80.0),
        (400.0, 520.0),
    ];
}

/// Power-up constants
pub mod powerup {
    /// Time between spawns (seconds)
    pub const SPAWN_INTERVAL: f32 = 8.0;
    /// Uncollected power-ups disappear after this long (seconds)
    pub const LIFETIME: f32 = 15.0;
    /// Maximum concurrently live power-ups
    pub const MAX_LIVE: usize = 3;
    /// Tank center to power-up center distance that triggers collection
    pub const COLLECTION_RADIUS: f32 = 25.0;
    /// Spawn area (x range, y range) inside the arena
    pub const SPAWN_X: (f32, f32) = (100.0, 700.0);
    pub const SPAWN_Y: (f32, f32) = (100.0, 500.0);
    /// Clearance kept between a spawned power-up and any obstacle
    pub const SPAWN_CLEARANCE: f32 = 15.0;
    /// Attempts to find an obstacle-free spawn position per spawn
    pub const MAX_SPAWN_ATTEMPTS: u32 = 20;
    /// Maximum stacked shield pickups when shield stacking is enabled
    pub const MAX_SHIELD_STACKS: u32 = 3;

    /// Instant heal amount
    pub const HEAL_AMOUNT: f32 = 50.0;
    /// Speed multiplier while boosted
    pub const SPEED_MULTIPLIER: f32 = 1.5;
    pub const SPEED_DURATION: f32 = 15.0;
    /// Damage multiplier while boosted
    pub const DAMAGE_MULTIPLIER: f32 = 1.8;
    pub const DAMAGE_DURATION: f32 = 12.0;
    /// Shield points per pickup
    pub const SHIELD_AMOUNT: f32 = 75.0;
    pub const SHIELD_DURATION: f32 = 20.0;
    /// Cooldown multiplier while rapid fire is active (70% shorter)
    pub const RAPID_FIRE_MULTIPLIER: f32 = 0.3;
    pub const RAPID_FIRE_DURATION: f32 = 10.0;

    /// Relative spawn weights
    pub const WEIGHT_HEALTH: u32 = 30;
    pub const WEIGHT_SPEED: u32 = 25;
    pub const WEIGHT_DAMAGE: u32 = 20;
    pub const WEIGHT_SHIELD: u32 = 15;
    pub const WEIGHT_RAPID_FIRE: u32 = 7;
}

/// AI tank constants
pub mod ai {
    /// Beyond this distance the AI closes in on the player
    pub const FAR_DISTANCE: f32 = 200.0;
    /// Inside this distance the AI backs off
    pub const NEAR_DISTANCE: f32 = 100.0;
    /// Intent magnitudes per behavior band
    pub const APPROACH_STRENGTH: f32 = 0.8;
    pub const RETREAT_STRENGTH: f32 = 0.6;
    pub const STRAFE_STRENGTH: f32 = 0.5;
    /// Maximum lateral component mixed into a retreat
    pub const RETREAT_JITTER: f32 = 0.3;
    /// Decision interval jitter (fraction of the reaction time)
    pub const DECISION_JITTER: f32 = 0.2;
    /// Body only turns toward the player when off by more than this (degrees)
    pub const TURN_THRESHOLD: f32 = 10.0;
    /// AI body turn rate relative to the player's
    pub const TURN_RATE_FACTOR: f32 = 0.8;
    /// Fire only when aimed within this cone (degrees)
    pub const FIRE_CONE: f32 = 30.0;
    /// Minimum time since the last shot, as a multiple of the weapon cooldown
    pub const FIRE_COOLDOWN_FACTOR: f32 = 1.5;
    /// Per-frame fire chance scale, multiplied by aggressiveness and accuracy
    pub const FIRE_CHANCE_SCALE: f32 = 0.15;
    /// AI acceleration relative to the player
    pub const ACCELERATION_FACTOR: f32 = 0.7;
    /// AI top speed relative to the player
    pub const MAX_SPEED_FACTOR: f32 = 0.8;
}
