use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StatsData {
    high_score: u32,
    games_played: u32,
}

/// Cross-session counters, owned by whoever builds the game (the CLI keeps
/// one per process and persists it next to the config). Starts zeroed;
/// `record_game` is the only writer during play, `reset` and the load/save
/// pair are explicit caller-driven operations.
pub struct GameStatistics {
    data: Mutex<StatsData>,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(StatsData::default()),
        }
    }

    pub async fn high_score(&self) -> u32 {
        self.data.lock().await.high_score
    }

    pub async fn games_played(&self) -> u32 {
        self.data.lock().await.games_played
    }

    /// Records a completed game. Returns true when `score` sets a new high
    /// score.
    pub async fn record_game(&self, score: u32) -> bool {
        let mut data = self.data.lock().await;
        data.games_played += 1;
        if score > data.high_score {
            data.high_score = score;
            tracing::info!("🏆 New high score: {}", score);
            true
        } else {
            false
        }
    }

    pub async fn reset(&self) {
        let mut data = self.data.lock().await;
        *data = StatsData::default();
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let data: StatsData = serde_json::from_str(&content)?;
        Ok(Self {
            data: Mutex::new(data),
        })
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let data = self.data.lock().await.clone();
        let content = serde_json::to_string_pretty(&data)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for GameStatistics {
    fn default() -> Self {
        Self::new()
    }
}
