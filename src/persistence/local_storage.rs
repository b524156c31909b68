//! Browser best-score store backed by LocalStorage

use super::ScoreStore;
use crate::highscores::HighScore;

/// Best score kept under a LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
    high: HighScore,
}

impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "rocketFlapperHighScore";

    pub fn open(key: &str) -> Self {
        let high = Self::storage()
            .and_then(|storage| storage.get_item(key).ok().flatten())
            .and_then(|raw| {
                // Older saves stored the bare number
                serde_json::from_str::<HighScore>(&raw)
                    .ok()
                    .or_else(|| raw.trim().parse().ok().map(HighScore::new))
            })
            .unwrap_or_default();
        log::info!("Best score {} loaded from LocalStorage", high.best);
        Self {
            key: key.to_string(),
            high,
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl ScoreStore for LocalStorageStore {
    fn high_score(&self) -> u64 {
        self.high.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.high.best = score;
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score not saved");
            return;
        };
        if let Ok(json) = serde_json::to_string(&self.high) {
            if storage.set_item(&self.key, &json).is_err() {
                log::warn!("LocalStorage write failed");
            }
        }
    }
}
