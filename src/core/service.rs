use crate::core::engine::ValidationEngine;
use crate::core::normalizer::normalize;
use crate::domain::model::{Category, ValidationResult};
use crate::domain::ports::{CategoryRepository, ValidationCache};
use std::sync::Arc;

/// Facade in front of the validation pipeline: resolves the category,
/// fast-paths on the persistent cache, delegates to the engine, and persists
/// fresh positive verdicts for future instant lookups.
pub struct ValidationService {
    repository: Arc<dyn CategoryRepository>,
    cache: Arc<dyn ValidationCache>,
    engine: ValidationEngine,
}

impl ValidationService {
    pub fn new(
        repository: Arc<dyn CategoryRepository>,
        cache: Arc<dyn ValidationCache>,
        engine: ValidationEngine,
    ) -> Self {
        Self {
            repository,
            cache,
            engine,
        }
    }

    pub fn category(&self, name: &str) -> Option<Category> {
        self.repository.find_by_name(&normalize(name))
    }

    pub async fn validate_word(&self, category_name: &str, word: &str) -> ValidationResult {
        if word.trim().is_empty() {
            return ValidationResult::invalid(0.0, "input", "empty word");
        }

        let category_key = normalize(category_name);
        let Some(category) = self.repository.find_by_name(&category_key) else {
            // Configuration fault, not a word-quality fault.
            tracing::error!("🚫 Unknown category: '{}'", category_name);
            return ValidationResult::error(
                "service",
                format!("unknown category '{}'", category_name),
            );
        };
        if !category.enabled {
            tracing::error!("🚫 Category '{}' is disabled", category.name);
            return ValidationResult::error(
                "service",
                format!("category '{}' is disabled", category.name),
            );
        }

        let word_key = normalize(word);
        match self.cache.has(&word_key, &category.name).await {
            Ok(true) => {
                tracing::debug!("⚡ Cache fast path for '{}' in '{}'", word_key, category.name);
                return ValidationResult::valid(1.0, "cache", "previously confirmed");
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Cache probe failed, continuing to pipeline: {}", e),
        }

        let result = self.engine.validate(&word_key, &category).await;

        if result.is_valid() {
            if let Err(e) = self.cache.put(&word_key, &category.name).await {
                tracing::warn!("📦 Failed to cache validated word '{}': {}", word_key, e);
            }
        }

        result
    }
}
