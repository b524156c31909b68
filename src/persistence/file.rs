//! Native best-score store: a small JSON file

use std::path::{Path, PathBuf};

use super::ScoreStore;
use crate::highscores::HighScore;

/// Best score kept as `{"best": n}` on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    high: HighScore,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file starts from zero.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let high = Self::load(&path);
        Self { path, high }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> HighScore {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScore>(&json) {
                Ok(high) => {
                    log::info!("Loaded best score {} from {}", high.best, path.display());
                    high
                }
                Err(err) => {
                    log::warn!("Corrupt high score file {}: {err}", path.display());
                    HighScore::default()
                }
            },
            Err(_) => {
                log::info!("No high score file at {}, starting fresh", path.display());
                HighScore::default()
            }
        }
    }

    fn save(&self) {
        let json = match serde_json::to_string(&self.high) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not encode high score: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            log::warn!("Could not save high score to {}: {err}", self.path.display());
        } else {
            log::debug!("High score {} saved", self.high.best);
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn high_score(&self) -> u64 {
        self.high.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.high.best = score;
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.high_score(), 0);
        store.set_high_score(1_260);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.high_score(), 1_260);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(JsonFileStore::open(&path).high_score(), 0);
    }

    #[test]
    fn test_unwritable_path_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("missing/dir/best.json"));
        store.set_high_score(10);
        assert_eq!(store.high_score(), 10);
    }
}
