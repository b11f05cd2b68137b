pub mod clock;
pub mod constants;
pub mod events;
pub mod game_loop;
pub mod input;
pub mod match_result;
pub mod snapshot;
pub mod spatial;
pub mod state;
pub mod systems;
