use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A semantic bucket words are validated against (e.g. "animal", "pays").
///
/// Owned by the category repository; the validation core only reads it.
/// Predefined categories are immutable and cannot be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub display_name: String,
    pub icon: String,
    pub hint: String,
    pub enabled: bool,
    pub predefined: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            icon: String::new(),
            hint: String::new(),
            enabled: true,
            predefined: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = hint.to_string();
        self
    }

    pub fn predefined(mut self) -> Self {
        self.predefined = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    Uncertain,
    Error,
}

/// Outcome of one validation attempt, produced by a strategy or a resolver.
///
/// Invariant: `confidence` is always within [0.0, 1.0] regardless of what a
/// strategy computes internally; the constructors clamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub confidence: f64,
    pub source: String,
    pub details: String,
}

impl ValidationResult {
    pub fn new(
        status: ValidationStatus,
        confidence: f64,
        source: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            status,
            confidence,
            source: source.into(),
            details: details.into(),
        }
    }

    pub fn valid(confidence: f64, source: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Valid, confidence, source, details)
    }

    pub fn invalid(confidence: f64, source: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Invalid, confidence, source, details)
    }

    pub fn uncertain(
        confidence: f64,
        source: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::new(ValidationStatus::Uncertain, confidence, source, details)
    }

    pub fn error(source: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(ValidationStatus::Error, 0.0, source, details)
    }

    pub fn is_valid(&self) -> bool {
        self.status == ValidationStatus::Valid
    }

    /// A result is confident when it carries a definitive verdict at or above
    /// the given confidence threshold.
    pub fn is_confident(&self, threshold: f64) -> bool {
        matches!(
            self.status,
            ValidationStatus::Valid | ValidationStatus::Invalid
        ) && self.confidence >= threshold
    }

    /// Comparison rule used when accumulating a best result across strategies:
    /// `Valid` beats anything that isn't, `Uncertain` beats `Invalid`, and
    /// among equal statuses the higher confidence wins.
    pub fn outranks(&self, other: &ValidationResult) -> bool {
        fn rank(status: ValidationStatus) -> u8 {
            match status {
                ValidationStatus::Valid => 3,
                ValidationStatus::Uncertain => 2,
                ValidationStatus::Invalid => 1,
                ValidationStatus::Error => 0,
            }
        }
        match rank(self.status).cmp(&rank(other.status)) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.confidence > other.confidence,
        }
    }
}

/// Lifecycle states of one timed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Init,
    Running,
    Finished,
    DialogShown,
    Transitioning,
}

/// Which of the two competing triggers ended the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishTrigger {
    TimerExpired,
    ManualStop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub category: String,
    pub word: String,
    pub result: ValidationResult,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub letter: char,
    pub outcomes: Vec<CategoryOutcome>,
    pub score: u32,
    pub trigger: FinishTrigger,
}

/// Handed off to the presentation layer when the last round has been played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub rounds_played: u32,
    pub total_score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(ValidationResult::valid(1.7, "test", "").confidence, 1.0);
        assert_eq!(ValidationResult::invalid(-0.3, "test", "").confidence, 0.0);
        assert_eq!(ValidationResult::valid(f64::NAN, "test", "").confidence, 0.0);
        assert_eq!(ValidationResult::valid(0.42, "test", "").confidence, 0.42);
    }

    #[test]
    fn test_is_confident() {
        assert!(ValidationResult::valid(0.9, "test", "").is_confident(0.7));
        assert!(ValidationResult::invalid(0.7, "test", "").is_confident(0.7));
        assert!(!ValidationResult::valid(0.5, "test", "").is_confident(0.7));
        assert!(!ValidationResult::uncertain(1.0, "test", "").is_confident(0.7));
    }

    #[test]
    fn test_outranks_ordering() {
        let valid_low = ValidationResult::valid(0.1, "a", "");
        let valid_high = ValidationResult::valid(0.8, "b", "");
        let uncertain = ValidationResult::uncertain(1.0, "c", "");
        let invalid = ValidationResult::invalid(1.0, "d", "");

        assert!(valid_low.outranks(&uncertain));
        assert!(valid_low.outranks(&invalid));
        assert!(uncertain.outranks(&invalid));
        assert!(valid_high.outranks(&valid_low));
        assert!(!valid_low.outranks(&valid_high));
        assert!(!invalid.outranks(&uncertain));
    }

    #[test]
    fn test_category_builder() {
        let category = Category::new("animal", "Animal")
            .with_icon("🐾")
            .with_hint("Un être vivant")
            .predefined();
        assert_eq!(category.name, "animal");
        assert!(category.enabled);
        assert!(category.predefined);
    }
}
