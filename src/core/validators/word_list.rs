use crate::core::normalizer::normalize;
use crate::domain::model::{Category, ValidationResult};
use crate::domain::ports::Validator;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

pub const SOURCE: &str = "deterministic-list";

/// Checks category-specific curated word lists. A listed word is valid with
/// full confidence; an unlisted one is deferred to later stages, because a
/// finite list can only ever confirm membership, not deny it.
pub struct WordListValidator {
    lists: HashMap<String, HashSet<String>>,
}

impl WordListValidator {
    pub fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    /// Registers (or extends) the curated list for a category. Words are
    /// normalized at load so lookups are a plain set probe.
    pub fn add_list<I, S>(&mut self, category: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.lists.entry(normalize(category)).or_default();
        for word in words {
            let word = normalize(word.as_ref());
            if !word.is_empty() {
                entry.insert(word);
            }
        }
    }

    pub fn with_list<I, S>(mut self, category: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_list(category, words);
        self
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }
}

impl Default for WordListValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Validator for WordListValidator {
    async fn validate(&self, word: &str, category: &Category) -> Result<ValidationResult> {
        let word = normalize(word);
        let listed = self
            .lists
            .get(&category.name)
            .map(|list| list.contains(&word))
            .unwrap_or(false);

        if listed {
            Ok(ValidationResult::valid(
                1.0,
                SOURCE,
                "found in curated list",
            ))
        } else {
            Ok(ValidationResult::uncertain(0.0, SOURCE, "not in list"))
        }
    }

    async fn is_available(&self) -> bool {
        !self.lists.is_empty()
    }

    fn source_name(&self) -> &str {
        SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ValidationStatus;

    #[tokio::test]
    async fn test_listed_word_is_valid_with_full_confidence() {
        let validator = WordListValidator::new().with_list("animal", ["chien", "chat"]);
        let category = Category::new("animal", "Animal");

        let result = validator.validate("Chien", &category).await.unwrap();
        assert_eq!(result.status, ValidationStatus::Valid);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.source, "deterministic-list");
    }

    #[tokio::test]
    async fn test_miss_defers_instead_of_rejecting() {
        let validator = WordListValidator::new().with_list("animal", ["chien"]);
        let category = Category::new("animal", "Animal");

        let result = validator.validate("axolotl", &category).await.unwrap();
        assert_eq!(result.status, ValidationStatus::Uncertain);
    }

    #[tokio::test]
    async fn test_lookup_is_normalized() {
        let validator = WordListValidator::new().with_list("animal", ["Éléphant"]);
        let category = Category::new("animal", "Animal");

        let result = validator.validate("  elephant ", &category).await.unwrap();
        assert_eq!(result.status, ValidationStatus::Valid);
    }

    #[tokio::test]
    async fn test_unavailable_without_lists() {
        let validator = WordListValidator::new();
        assert!(!validator.is_available().await);

        let loaded = WordListValidator::new().with_list("animal", ["chien"]);
        assert!(loaded.is_available().await);
    }
}
