//! Durable best-score storage
//!
//! Failures never reach the game: a store that can't be read starts at zero,
//! a write that fails is logged and dropped.

use crate::highscores::HighScore;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key-value store holding the best score
pub trait ScoreStore {
    fn high_score(&self) -> u64;
    fn set_high_score(&mut self, score: u64);
}

/// In-memory store (tests, headless runs without a file)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high: HighScore,
    /// Number of writes, for observing persistence behavior
    pub writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(best: u64) -> Self {
        Self {
            high: HighScore::new(best),
            writes: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn high_score(&self) -> u64 {
        self.high.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.high.best = score;
        self.writes += 1;
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn high_score(&self) -> u64 {
        (**self).high_score()
    }

    fn set_high_score(&mut self, score: u64) {
        (**self).set_high_score(score)
    }
}
