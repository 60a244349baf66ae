use crate::core::normalizer::normalize;
use crate::domain::model::Category;
use crate::domain::ports::{CategoryRepository, ValidationCache};
use crate::utils::error::{GameError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use tokio::sync::Mutex;

/// Category store backed by a process-local map. Predefined categories are
/// immutable: they cannot be removed or overwritten.
pub struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<String, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// The classic petit-bac category set.
    pub fn with_defaults() -> Self {
        let repository = Self::new();
        let defaults = [
            Category::new("animal", "Animal")
                .with_icon("🐾")
                .with_hint("Un être vivant qui n'est pas une plante")
                .predefined(),
            Category::new("pays", "Pays")
                .with_icon("🌍")
                .with_hint("Un État reconnu")
                .predefined(),
            Category::new("ville", "Ville")
                .with_icon("🏙️")
                .with_hint("Une ville ou commune")
                .predefined(),
            Category::new("aliment", "Aliment")
                .with_icon("🍎")
                .with_hint("Quelque chose qui se mange")
                .predefined(),
            Category::new("metier", "Métier")
                .with_icon("💼")
                .with_hint("Une profession")
                .predefined(),
        ];
        for category in defaults {
            // Writing into a fresh map cannot hit the predefined guard.
            let _ = repository.insert(category);
        }
        repository
    }

    pub fn insert(&self, category: Category) -> Result<()> {
        let key = normalize(&category.name);
        let mut categories = self
            .categories
            .write()
            .map_err(|_| GameError::ProcessingError {
                message: "category store lock poisoned".to_string(),
            })?;
        if categories.get(&key).map(|c| c.predefined).unwrap_or(false) {
            return Err(GameError::ProcessingError {
                message: format!("predefined category '{}' is immutable", key),
            });
        }
        let mut category = category;
        category.name = key.clone();
        categories.insert(key, category);
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<bool> {
        let key = normalize(name);
        let mut categories = self
            .categories
            .write()
            .map_err(|_| GameError::ProcessingError {
                message: "category store lock poisoned".to_string(),
            })?;
        if categories.get(&key).map(|c| c.predefined).unwrap_or(false) {
            return Err(GameError::ProcessingError {
                message: format!("predefined category '{}' cannot be removed", key),
            });
        }
        Ok(categories.remove(&key).is_some())
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryRepository for InMemoryCategoryRepository {
    fn find_by_name(&self, name: &str) -> Option<Category> {
        self.categories.read().ok()?.get(name).cloned()
    }

    fn all(&self) -> Vec<Category> {
        let mut all: Vec<Category> = self
            .categories
            .read()
            .map(|categories| categories.values().cloned().collect())
            .unwrap_or_default();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

/// Cache of confirmed (word, category) pairs. Keys are stored as given; the
/// validation core normalizes before calling.
pub struct InMemoryValidationCache {
    entries: Mutex<HashSet<(String, String)>>,
}

impl InMemoryValidationCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashSet::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl Default for InMemoryValidationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValidationCache for InMemoryValidationCache {
    async fn has(&self, word: &str, category: &str) -> Result<bool> {
        let entries = self.entries.lock().await;
        Ok(entries.contains(&(word.to_string(), category.to_string())))
    }

    async fn put(&self, word: &str, category: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert((word.to_string(), category.to_string()));
        Ok(())
    }
}
