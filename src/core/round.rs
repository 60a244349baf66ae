use crate::core::normalizer::{first_letter_matches, normalize, normalize_letter};
use crate::core::service::ValidationService;
use crate::domain::model::{
    Category, CategoryOutcome, FinishTrigger, RoundOutcome, RoundState, ValidationResult,
};
use crate::utils::error::{GameError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_ROUND_SECONDS: u32 = 60;

struct RoundData {
    state: RoundState,
    letter: char,
    remaining_seconds: u32,
    submissions: HashMap<String, String>,
    accepted: HashSet<String>,
    outcome: Option<RoundOutcome>,
}

/// Lifecycle of one timed round.
///
/// Both finish triggers (the 1 Hz countdown reaching zero and a manual stop)
/// funnel into [`finish`](Self::finish), where an atomic check-and-set
/// guarantees that exactly one caller performs the batch scoring pass; every
/// other caller observes the guard and returns without effect. Result
/// presentation is guarded the same way, independently.
///
/// All methods take `&self`; share the engine as `Arc<RoundEngine>` between
/// the timer task and the UI/game loop.
pub struct RoundEngine {
    service: Arc<ValidationService>,
    categories: Vec<Category>,
    round_seconds: u32,
    data: Mutex<RoundData>,
    scored: AtomicBool,
    result_shown: AtomicBool,
}

impl RoundEngine {
    pub fn new(
        service: Arc<ValidationService>,
        categories: Vec<Category>,
        round_seconds: u32,
    ) -> Self {
        Self {
            service,
            categories,
            round_seconds,
            data: Mutex::new(RoundData {
                state: RoundState::Init,
                letter: '\0',
                remaining_seconds: 0,
                submissions: HashMap::new(),
                accepted: HashSet::new(),
                outcome: None,
            }),
            scored: AtomicBool::new(false),
            result_shown: AtomicBool::new(false),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub async fn state(&self) -> RoundState {
        self.data.lock().await.state
    }

    pub async fn remaining_seconds(&self) -> u32 {
        self.data.lock().await.remaining_seconds
    }

    pub async fn outcome(&self) -> Option<RoundOutcome> {
        self.data.lock().await.outcome.clone()
    }

    /// Begins the round: clears the submission set, resets both
    /// exactly-once guards, arms the countdown, and enters `Running`.
    pub async fn start(&self, letter: char) -> Result<()> {
        let mut data = self.data.lock().await;
        match data.state {
            RoundState::Init | RoundState::Transitioning => {}
            from => {
                return Err(GameError::InvalidTransition {
                    from,
                    action: "start",
                })
            }
        }
        data.state = RoundState::Running;
        data.letter = normalize_letter(letter);
        data.remaining_seconds = self.round_seconds;
        data.submissions.clear();
        data.accepted.clear();
        data.outcome = None;
        self.scored.store(false, Ordering::SeqCst);
        self.result_shown.store(false, Ordering::SeqCst);
        tracing::info!(
            "▶️ Round started: letter '{}', {} categories, {} seconds",
            data.letter,
            self.categories.len(),
            self.round_seconds
        );
        Ok(())
    }

    /// Records (or replaces) the submission for a category. Legal only while
    /// the round is `Running`; once scoring has begun, editing is disabled.
    pub async fn submit(&self, category_name: &str, word: &str) -> Result<()> {
        let mut data = self.data.lock().await;
        if data.state != RoundState::Running {
            return Err(GameError::InvalidTransition {
                from: data.state,
                action: "submit",
            });
        }
        let key = normalize(category_name);
        if !self.categories.iter().any(|c| c.name == key) {
            return Err(GameError::ProcessingError {
                message: format!("unknown category '{}'", category_name),
            });
        }
        data.submissions.insert(key, word.to_string());
        Ok(())
    }

    /// One countdown step. Returns the remaining seconds, or `None` once the
    /// round is no longer running. The caller triggers
    /// `finish(TimerExpired)` when this reaches zero.
    pub async fn tick(&self) -> Option<u32> {
        let mut data = self.data.lock().await;
        if data.state != RoundState::Running {
            return None;
        }
        data.remaining_seconds = data.remaining_seconds.saturating_sub(1);
        Some(data.remaining_seconds)
    }

    /// Drives the 1 Hz countdown until expiry, then fires the timer finish
    /// trigger. Returns the outcome if this task won the scoring race, which
    /// it loses whenever a manual stop lands first.
    pub async fn run_countdown(&self) -> Option<RoundOutcome> {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await; // first tick completes immediately
        loop {
            interval.tick().await;
            match self.tick().await {
                Some(0) => return self.finish(FinishTrigger::TimerExpired).await,
                Some(_) => {}
                None => return None,
            }
        }
    }

    /// The guarded `Running -> Finished` transition. Exactly one caller per
    /// round gets `Some(outcome)` and performs the scoring pass; concurrent
    /// or repeated triggers get `None` and do no work.
    pub async fn finish(&self, trigger: FinishTrigger) -> Option<RoundOutcome> {
        // Winner selection is one critical section: state check, guard
        // check-and-set, and entry into Finished. Entering Finished here
        // disables submission editing for the duration of the scoring pass;
        // validation itself runs without the lock.
        let (letter, submissions) = {
            let mut data = self.data.lock().await;
            if data.state != RoundState::Running {
                return None;
            }
            if self
                .scored
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                tracing::debug!("⏭️ Finish trigger {:?} ignored, already scored", trigger);
                return None;
            }
            data.state = RoundState::Finished;
            let submissions: Vec<(Category, String)> = self
                .categories
                .iter()
                .map(|category| {
                    let word = data
                        .submissions
                        .get(&category.name)
                        .cloned()
                        .unwrap_or_default();
                    (category.clone(), word)
                })
                .collect();
            (data.letter, submissions)
        };

        tracing::info!(
            "🏁 Round finished by {:?}, scoring {} categories",
            trigger,
            submissions.len()
        );

        // Single serialized pass: duplicate detection depends on categories
        // being scored one after another.
        let mut accepted: HashSet<String> = HashSet::new();
        let mut outcomes = Vec::with_capacity(submissions.len());
        let mut score = 0;
        for (category, word) in submissions {
            let result = self
                .score_submission(&category, &word, letter, &accepted)
                .await;
            let points = if result.is_valid() {
                accepted.insert(normalize(&word));
                1
            } else {
                0
            };
            score += points;
            tracing::debug!(
                "{} '{}' in '{}': {:?} (+{})",
                if points > 0 { "✅" } else { "❌" },
                word,
                category.name,
                result.status,
                points
            );
            outcomes.push(CategoryOutcome {
                category: category.name,
                word,
                result,
                points,
            });
        }

        let outcome = RoundOutcome {
            letter,
            outcomes,
            score,
            trigger,
        };
        {
            let mut data = self.data.lock().await;
            data.accepted = accepted;
            data.outcome = Some(outcome.clone());
        }
        tracing::info!("🧮 Round score: {}", score);
        Some(outcome)
    }

    async fn score_submission(
        &self,
        category: &Category,
        word: &str,
        letter: char,
        accepted: &HashSet<String>,
    ) -> ValidationResult {
        if word.trim().is_empty() {
            return ValidationResult::invalid(0.0, "input", "no word submitted");
        }
        let normalized = normalize(word);
        if !first_letter_matches(&normalized, letter) {
            return ValidationResult::invalid(
                0.0,
                "letter-rule",
                format!("does not start with '{}'", letter),
            );
        }
        if accepted.contains(&normalized) {
            return ValidationResult::invalid(0.0, "duplicate-rule", "word already used this round");
        }
        self.service.validate_word(&category.name, word).await
    }

    /// The guarded `Finished -> DialogShown` transition: hands the outcome
    /// to the presentation layer exactly once, independently of the scoring
    /// guard.
    pub async fn present(&self) -> Option<RoundOutcome> {
        let outcome = {
            let data = self.data.lock().await;
            if data.state != RoundState::Finished {
                return None;
            }
            data.outcome.clone()
        }?;
        if self
            .result_shown
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        let mut data = self.data.lock().await;
        data.state = RoundState::DialogShown;
        Some(outcome)
    }

    /// `DialogShown -> Transitioning`, after which `start` may begin the
    /// next round.
    pub async fn begin_transition(&self) -> Result<()> {
        let mut data = self.data.lock().await;
        if data.state != RoundState::DialogShown {
            return Err(GameError::InvalidTransition {
                from: data.state,
                action: "begin_transition",
            });
        }
        data.state = RoundState::Transitioning;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCategoryRepository, InMemoryValidationCache};
    use crate::core::engine::ValidationEngine;
    use crate::core::validators::word_list::WordListValidator;
    use crate::domain::model::ValidationStatus;
    use crate::domain::ports::CategoryRepository;

    fn engine_with_lists() -> Arc<RoundEngine> {
        let repository = Arc::new(InMemoryCategoryRepository::with_defaults());
        let cache = Arc::new(InMemoryValidationCache::new());
        let pipeline = ValidationEngine::new().with_validator(Box::new(
            WordListValidator::new()
                .with_list("animal", ["chien", "chat", "cheval"])
                .with_list("pays", ["chili", "chine", "canada"])
                .with_list("ville", ["caen", "calais"]),
        ));
        let service = Arc::new(ValidationService::new(repository.clone(), cache, pipeline));
        let categories = vec![
            repository.find_by_name("animal").unwrap(),
            repository.find_by_name("pays").unwrap(),
            repository.find_by_name("ville").unwrap(),
        ];
        Arc::new(RoundEngine::new(service, categories, 60))
    }

    #[tokio::test]
    async fn test_full_round_scores_valid_words() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.submit("animal", "Chien").await.unwrap();
        round.submit("pays", "Chili").await.unwrap();
        round.submit("ville", "Caen").await.unwrap();

        let outcome = round.finish(FinishTrigger::ManualStop).await.unwrap();
        assert_eq!(outcome.score, 3);
        assert_eq!(round.state().await, RoundState::Finished);
    }

    #[tokio::test]
    async fn test_letter_mismatch_is_rejected_without_validation() {
        let round = engine_with_lists();
        round.start('P').await.unwrap();
        // "chien" is in the curated list, but the round letter is P.
        round.submit("animal", "chien").await.unwrap();

        let outcome = round.finish(FinishTrigger::ManualStop).await.unwrap();
        assert_eq!(outcome.score, 0);
        let result = &outcome.outcomes[0].result;
        assert_eq!(result.status, ValidationStatus::Invalid);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.source, "letter-rule");
    }

    #[tokio::test]
    async fn test_duplicate_word_rejected_even_if_semantically_valid() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.submit("animal", "Chien").await.unwrap();
        // Same word, different category, different casing.
        round.submit("pays", "chien").await.unwrap();

        let outcome = round.finish(FinishTrigger::ManualStop).await.unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.outcomes[0].points, 1);
        assert_eq!(outcome.outcomes[1].points, 0);
        assert_eq!(outcome.outcomes[1].result.source, "duplicate-rule");
    }

    #[tokio::test]
    async fn test_empty_submission_scores_zero_without_validation() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.submit("animal", "chien").await.unwrap();
        // "pays" and "ville" left empty.

        let outcome = round.finish(FinishTrigger::TimerExpired).await.unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.outcomes[1].result.source, "input");
    }

    #[tokio::test]
    async fn test_double_trigger_scores_exactly_once() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.submit("animal", "chien").await.unwrap();

        // Timer expiry and manual stop race for the same transition.
        let (timer, stop) = tokio::join!(
            round.finish(FinishTrigger::TimerExpired),
            round.finish(FinishTrigger::ManualStop),
        );

        let winners = [&timer, &stop].iter().filter(|o| o.is_some()).count();
        assert_eq!(winners, 1);
        let outcome = timer.or(stop).unwrap();
        assert_eq!(outcome.score, 1);

        // A late trigger after the round is over is a silent no-op too.
        assert!(round.finish(FinishTrigger::ManualStop).await.is_none());
    }

    #[tokio::test]
    async fn test_result_presented_exactly_once() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.submit("animal", "chat").await.unwrap();
        round.finish(FinishTrigger::ManualStop).await.unwrap();

        assert!(round.present().await.is_some());
        assert_eq!(round.state().await, RoundState::DialogShown);
        assert!(round.present().await.is_none());
    }

    #[tokio::test]
    async fn test_present_before_finish_is_noop() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        assert!(round.present().await.is_none());
        // The guard was not consumed; presenting still works after scoring.
        round.finish(FinishTrigger::ManualStop).await.unwrap();
        assert!(round.present().await.is_some());
    }

    #[tokio::test]
    async fn test_submissions_rejected_after_finish() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.finish(FinishTrigger::TimerExpired).await.unwrap();

        let err = round.submit("animal", "chien").await.unwrap_err();
        assert!(matches!(err, GameError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_next_round_clears_submissions_and_guards() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        round.submit("animal", "chien").await.unwrap();
        round.finish(FinishTrigger::ManualStop).await.unwrap();
        round.present().await.unwrap();
        round.begin_transition().await.unwrap();

        round.start('C').await.unwrap();
        assert_eq!(round.state().await, RoundState::Running);

        // The accepted set was cleared: "chien" is valid again.
        round.submit("animal", "chien").await.unwrap();
        let outcome = round.finish(FinishTrigger::ManualStop).await.unwrap();
        assert_eq!(outcome.score, 1);
    }

    #[tokio::test]
    async fn test_start_from_running_is_rejected() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        let err = round.start('P').await.unwrap_err();
        assert!(matches!(err, GameError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_submit_unknown_category_is_rejected() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        assert!(round.submit("galaxie", "centaure").await.is_err());
    }

    #[tokio::test]
    async fn test_tick_counts_down_and_stops_after_finish() {
        let round = engine_with_lists();
        round.start('C').await.unwrap();
        assert_eq!(round.remaining_seconds().await, 60);
        assert_eq!(round.tick().await, Some(59));

        round.finish(FinishTrigger::ManualStop).await.unwrap();
        assert_eq!(round.tick().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expiry_triggers_scoring() {
        let repository = Arc::new(InMemoryCategoryRepository::with_defaults());
        let cache = Arc::new(InMemoryValidationCache::new());
        let pipeline = ValidationEngine::new()
            .with_validator(Box::new(WordListValidator::new().with_list("animal", ["chien"])));
        let service = Arc::new(ValidationService::new(repository.clone(), cache, pipeline));
        let categories = vec![repository.find_by_name("animal").unwrap()];
        let round = Arc::new(RoundEngine::new(service, categories, 3));

        round.start('C').await.unwrap();
        round.submit("animal", "chien").await.unwrap();

        // Paused tokio time auto-advances through the 1 Hz interval.
        let outcome = round.run_countdown().await.unwrap();
        assert_eq!(outcome.trigger, FinishTrigger::TimerExpired);
        assert_eq!(outcome.score, 1);
        assert_eq!(round.state().await, RoundState::Finished);
    }
}
