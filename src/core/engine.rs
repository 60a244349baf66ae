use crate::domain::model::{Category, ValidationResult, ValidationStatus};
use crate::domain::ports::Validator;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Confidence attached to the fail-closed rejection applied when no strategy
/// produced a confident verdict.
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Sequences validation strategies in order, escalating through them until
/// one is confident, then resolves any leftover ambiguity to a rejection.
///
/// The strategy list is runtime-mutable: strategies are appended with
/// [`add_validator`](Self::add_validator) and removed by source name. The
/// usual order is cache, curated list, semantic service, dictionary.
///
/// Post-condition: `validate` never returns `Uncertain` (and never `Error`);
/// callers always get an unambiguous accept or reject.
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
    confidence_threshold: f64,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn add_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn with_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.add_validator(validator);
        self
    }

    /// Removes the first strategy registered under `source_name`. Returns
    /// whether anything was removed.
    pub fn remove_validator(&mut self, source_name: &str) -> bool {
        match self
            .validators
            .iter()
            .position(|v| v.source_name() == source_name)
        {
            Some(index) => {
                self.validators.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn validator_names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.source_name()).collect()
    }

    pub async fn validate(&self, word: &str, category: &Category) -> ValidationResult {
        if word.trim().is_empty() {
            return ValidationResult::invalid(0.0, "engine", "empty word");
        }

        let mut best: Option<ValidationResult> = None;

        for validator in &self.validators {
            if !validator.is_available().await {
                tracing::debug!("⏭️ Skipping validator '{}' (unavailable)", validator.source_name());
                continue;
            }

            // One strategy's failure never aborts the whole pipeline.
            let result = match validator.validate(word, category).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("❌ Validator '{}' failed: {}", validator.source_name(), e);
                    continue;
                }
            };

            tracing::debug!(
                "Validator '{}': {:?} ({:.2}) for '{}' in '{}'",
                validator.source_name(),
                result.status,
                result.confidence,
                word,
                category.name
            );

            if result.is_confident(self.confidence_threshold) {
                return result;
            }

            let better = match &best {
                Some(current) => result.outranks(current),
                None => true,
            };
            if better {
                best = Some(result);
            }
        }

        let best = best.unwrap_or_else(|| {
            ValidationResult::uncertain(0.0, "engine", "no validator produced a result")
        });

        // Fail-closed: ambiguity becomes a conservative reject.
        if best.status == ValidationStatus::Uncertain || best.status == ValidationStatus::Error {
            return ValidationResult::invalid(
                FALLBACK_CONFIDENCE,
                "resolver-fallback",
                "no confident verdict",
            );
        }
        best
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
