//! Best-score tracking
//!
//! Only one value survives between games: the high-water mark.

use serde::{Deserialize, Serialize};

/// The persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Check if a score would raise the mark
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Raise the mark if `score` beats it. Returns true when it did.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }
}
