//! Rocket Flapper - a side-scrolling arcade game core
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, motion, collisions, phases)
//! - `game_loop`: Idle/Running/Terminal driver wiring the sim to its collaborators
//! - `presentation`: Sink trait the core pushes visual updates into
//! - `platform`: Clock, input sampling and logging setup
//! - `persistence`: Durable best-score storage
//! - `tuning`: Data-driven game balance (the two variant presets)

pub mod game_loop;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod presentation;
pub mod sim;
pub mod tuning;

pub use game_loop::{GameLoop, LoopState};
pub use highscores::HighScore;
pub use tuning::{Preset, TuningProfile};

/// Milliseconds on the game clock
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    use crate::Millis;

    /// Rendering cadence the per-frame tunings were authored against (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest frame scale applied under elapsed-time motion (prevents tunneling after a stall)
    pub const MAX_FRAME_SCALE: f32 = 4.0;

    /// Number of bonus hits that unlocks the final phase
    pub const BONUS_TARGET: u32 = 5;

    /// Score for letting an obstacle scroll past
    pub const EVADE_SCORE: u64 = 10;
    /// Score for a bonus hit
    pub const BONUS_SCORE: u64 = 50;
    /// Score for destroying the final target
    pub const FINAL_TARGET_SCORE: u64 = 1000;

    /// A hit bonus stays on screen this long before it is removed
    pub const BONUS_REMOVAL_DELAY_MS: Millis = 500;
    /// The final target is removed partway through its explosion
    pub const FINAL_TARGET_REMOVAL_DELAY_MS: Millis = 800;
    /// The win is announced once the explosion has played out
    pub const OUTCOME_DISPLAY_DELAY_MS: Millis = 1500;
}

/// Clamp a sampled coordinate into `[min, max]`, ignoring non-finite samples
#[inline]
pub fn clamp_sample(value: f32, min: f32, max: f32) -> Option<f32> {
    value.is_finite().then(|| clamp_between(value, min, max))
}

/// `f32::clamp` without the panic on inverted or NaN bounds
#[inline]
pub fn clamp_between(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_sample_drops_non_finite() {
        assert_eq!(clamp_sample(f32::NAN, 0.0, 10.0), None);
        assert_eq!(clamp_sample(f32::INFINITY, 0.0, 10.0), None);
        assert_eq!(clamp_sample(42.0, 0.0, 10.0), Some(10.0));
    }

    #[test]
    fn test_clamp_between_survives_bad_bounds() {
        assert_eq!(clamp_between(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp_between(5.0, 300.0, 100.0), 100.0);
        assert_eq!(clamp_between(5.0, f32::NAN, 10.0), 5.0);
    }
}
