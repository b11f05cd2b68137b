//! Frame delta computation with pause and game-over handling
//!
//! The driver passes a monotonic timestamp each animation frame. The clock
//! turns it into a clamped simulation delta, or `None` when no step should run.

use std::time::Duration;

use crate::game::constants::physics::{MAX_DT, MIN_DT};

#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    /// Timestamp deltas are measured from; `None` until the first tick
    last: Option<Duration>,
    paused: bool,
    game_over: bool,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the step for a frame at `now`.
    ///
    /// Returns `None` on the anchoring tick, while paused or game-over, and
    /// for deltas under `MIN_DT` (the anchor is kept so skipped time carries
    /// into the next frame). Steps are capped at `MAX_DT`.
    pub fn tick(&mut self, now: Duration) -> Option<f32> {
        if self.paused || self.game_over {
            return None;
        }

        let Some(last) = self.last else {
            self.last = Some(now);
            return None;
        };

        let Some(elapsed) = now.checked_sub(last) else {
            // Timestamp went backwards; re-anchor
            self.last = Some(now);
            return None;
        };

        let dt = elapsed.as_secs_f32();
        if dt < MIN_DT {
            return None;
        }

        self.last = Some(now);
        Some(dt.min(MAX_DT))
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume and re-anchor, so time spent paused never reaches the simulation
    pub fn resume(&mut self) {
        self.paused = false;
        self.last = None;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Latch game over; only `reset` clears it
    pub fn set_game_over(&mut self) {
        self.game_over = true;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_tick_anchors() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.tick(ms(1000)), None);
        let dt = clock.tick(ms(1016)).unwrap();
        assert!((dt - 0.016).abs() < 1e-5);
    }

    #[test]
    fn test_large_delta_clamped() {
        let mut clock = SimulationClock::new();
        clock.tick(ms(0));
        let dt = clock.tick(ms(2000)).unwrap();
        assert!((dt - MAX_DT).abs() < 1e-6);
    }

    #[test]
    fn test_small_delta_accrues() {
        let mut clock = SimulationClock::new();
        clock.tick(ms(100));
        assert_eq!(clock.tick(ms(103)), None);
        let dt = clock.tick(ms(106)).unwrap();
        assert!((dt - 0.006).abs() < 1e-5);
    }

    #[test]
    fn test_pause_freezes_and_resume_reanchors() {
        let mut clock = SimulationClock::new();
        clock.tick(ms(0));
        clock.tick(ms(16));
        clock.pause();
        assert_eq!(clock.tick(ms(5000)), None);

        clock.toggle_pause();
        assert!(!clock.is_paused());
        assert_eq!(clock.tick(ms(10_000)), None);
        let dt = clock.tick(ms(10_016)).unwrap();
        assert!((dt - 0.016).abs() < 1e-5);
    }

    #[test]
    fn test_game_over_latch() {
        let mut clock = SimulationClock::new();
        clock.tick(ms(0));
        clock.set_game_over();
        clock.resume();
        assert!(clock.is_game_over());
        assert_eq!(clock.tick(ms(100)), None);

        clock.reset();
        assert!(!clock.is_game_over());
    }

    #[test]
    fn test_backwards_timestamp_reanchors() {
        let mut clock = SimulationClock::new();
        clock.tick(ms(500));
        assert_eq!(clock.tick(ms(400)), None);
        assert!(clock.tick(ms(420)).is_some());
    }
}
