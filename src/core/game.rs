use crate::core::round::RoundEngine;
use crate::core::stats::GameStatistics;
use crate::domain::model::{GameSummary, RoundOutcome};
use crate::utils::error::{GameError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What comes after a presented round: another round, or the end-of-game
/// summary handed off to the presentation layer.
#[derive(Debug, Clone)]
pub enum NextStep {
    Round(char),
    GameOver(GameSummary),
}

struct Progress {
    next_letter: usize,
    rounds_played: u32,
    total_score: u32,
}

/// Sequences rounds over a fixed letter list and accumulates the game total.
/// One `GameSession` owns one `RoundEngine` for its whole lifetime; the
/// engine is re-armed per round.
pub struct GameSession {
    round: Arc<RoundEngine>,
    letters: Vec<char>,
    stats: Arc<GameStatistics>,
    progress: Mutex<Progress>,
}

impl GameSession {
    pub fn new(round: Arc<RoundEngine>, letters: Vec<char>, stats: Arc<GameStatistics>) -> Self {
        Self {
            round,
            letters,
            stats,
            progress: Mutex::new(Progress {
                next_letter: 0,
                rounds_played: 0,
                total_score: 0,
            }),
        }
    }

    pub fn round(&self) -> &Arc<RoundEngine> {
        &self.round
    }

    /// Starts round one. Errors when no letters are configured.
    pub async fn start(&self) -> Result<char> {
        let mut progress = self.progress.lock().await;
        let letter = *self
            .letters
            .first()
            .ok_or_else(|| GameError::MissingConfigError {
                field: "game.letters".to_string(),
            })?;
        self.round.start(letter).await?;
        progress.next_letter = 1;
        Ok(letter)
    }

    /// Presents the finished round and folds its score into the game total.
    /// Exactly-once semantics come from the round engine's own guard.
    pub async fn present_round(&self) -> Option<RoundOutcome> {
        let outcome = self.round.present().await?;
        let mut progress = self.progress.lock().await;
        progress.rounds_played += 1;
        progress.total_score += outcome.score;
        Some(outcome)
    }

    /// Advances past a presented round: starts the next one if letters
    /// remain, otherwise records the game into the statistics collaborator
    /// and returns the summary handoff.
    pub async fn next_round(&self) -> Result<NextStep> {
        let mut progress = self.progress.lock().await;
        if progress.next_letter < self.letters.len() {
            let letter = self.letters[progress.next_letter];
            self.round.begin_transition().await?;
            self.round.start(letter).await?;
            progress.next_letter += 1;
            return Ok(NextStep::Round(letter));
        }

        let new_high_score = self.stats.record_game(progress.total_score).await;
        let summary = GameSummary {
            rounds_played: progress.rounds_played,
            total_score: progress.total_score,
            high_score: self.stats.high_score().await,
            new_high_score,
        };
        tracing::info!(
            "🎉 Game over: {} points over {} rounds",
            summary.total_score,
            summary.rounds_played
        );
        Ok(NextStep::GameOver(summary))
    }
}
