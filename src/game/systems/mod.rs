pub mod ai;
pub mod collision;
pub mod physics;
pub mod powerup;
pub mod respawn;
pub mod weapon;
