use crate::adapters::memory::{InMemoryCategoryRepository, InMemoryValidationCache};
use crate::core::engine::{ValidationEngine, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::core::normalizer::normalize;
use crate::core::round::{RoundEngine, DEFAULT_ROUND_SECONDS};
use crate::core::service::ValidationService;
use crate::core::stats::GameStatistics;
use crate::core::game::GameSession;
use crate::core::validators::{
    CacheLookupValidator, DictionaryApiValidator, SemanticApiValidator, WordListValidator,
};
use crate::domain::model::Category;
use crate::domain::ports::{CategoryRepository, ValidationCache};
use crate::utils::error::{GameError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_single_letter,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: GameSettings,
    pub validation: Option<ValidationSettings>,
    pub semantic: Option<SemanticSettings>,
    pub dictionary: Option<DictionarySettings>,
    #[serde(default)]
    pub categories: Vec<CategorySettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    pub round_seconds: Option<u32>,
    pub letters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub confidence_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticSettings {
    pub endpoint: String,
    pub health_endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub confidence_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionarySettings {
    pub endpoint: String,
    pub language: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySettings {
    pub name: String,
    pub display_name: Option<String>,
    pub icon: Option<String>,
    pub hint: Option<String>,
    pub enabled: Option<bool>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub words: Vec<String>,
}

impl CategorySettings {
    fn to_category(&self) -> Category {
        let mut category = Category::new(
            &self.name,
            self.display_name.as_deref().unwrap_or(&self.name),
        );
        if let Some(icon) = &self.icon {
            category = category.with_icon(icon);
        }
        if let Some(hint) = &self.hint {
            category = category.with_hint(hint);
        }
        if self.enabled == Some(false) {
            category = category.disabled();
        }
        category
    }
}

impl GameConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GameError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GameError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values;
    /// unresolved placeholders are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GameError::ProcessingError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("game.round_seconds", u64::from(self.round_seconds()), 5)?;

        if self.game.letters.is_empty() {
            return Err(GameError::MissingConfigError {
                field: "game.letters".to_string(),
            });
        }
        for letter in &self.game.letters {
            validate_single_letter("game.letters", letter)?;
        }

        validate_range(
            "validation.confidence_threshold",
            self.confidence_threshold(),
            0.0,
            1.0,
        )?;

        if let Some(semantic) = &self.semantic {
            validate_url("semantic.endpoint", &semantic.endpoint)?;
            if let Some(health_endpoint) = &semantic.health_endpoint {
                validate_url("semantic.health_endpoint", health_endpoint)?;
            }
            if let Some(threshold) = semantic.confidence_threshold {
                validate_range("semantic.confidence_threshold", threshold, 0.0, 1.0)?;
            }
        }

        if let Some(dictionary) = &self.dictionary {
            validate_url("dictionary.endpoint", &dictionary.endpoint)?;
        }

        for category in &self.categories {
            validate_non_empty_string("categories.name", &category.name)?;
        }

        Ok(())
    }

    pub fn round_seconds(&self) -> u32 {
        self.game.round_seconds.unwrap_or(DEFAULT_ROUND_SECONDS)
    }

    pub fn letters(&self) -> Result<Vec<char>> {
        self.game
            .letters
            .iter()
            .map(|letter| validate_single_letter("game.letters", letter))
            .collect()
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.validation
            .as_ref()
            .and_then(|v| v.confidence_threshold)
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Predefined categories plus any custom ones declared in the file.
    /// Declarations matching a predefined name only contribute words and
    /// keywords to the pipeline; the predefined entry itself is kept.
    pub fn build_repository(&self) -> Result<Arc<InMemoryCategoryRepository>> {
        let repository = InMemoryCategoryRepository::with_defaults();
        for settings in &self.categories {
            if repository
                .find_by_name(&normalize(&settings.name))
                .is_none()
            {
                repository.insert(settings.to_category())?;
            }
        }
        Ok(Arc::new(repository))
    }

    /// Assembles the default pipeline order: cache, curated lists, semantic
    /// service, dictionary. Network stages are only present when their
    /// config sections are.
    pub fn build_engine(&self, cache: Arc<dyn ValidationCache>) -> ValidationEngine {
        let mut engine =
            ValidationEngine::new().with_confidence_threshold(self.confidence_threshold());

        engine.add_validator(Box::new(CacheLookupValidator::new(cache)));

        let mut word_list = WordListValidator::new();
        for category in &self.categories {
            if !category.words.is_empty() {
                word_list.add_list(&category.name, &category.words);
            }
        }
        engine.add_validator(Box::new(word_list));

        if let Some(semantic) = &self.semantic {
            let mut validator = SemanticApiValidator::new(&semantic.endpoint)
                .with_confidence_threshold(
                    semantic
                        .confidence_threshold
                        .unwrap_or_else(|| self.confidence_threshold()),
                );
            if let Some(health_endpoint) = &semantic.health_endpoint {
                validator = validator.with_health_endpoint(health_endpoint);
            }
            if let Some(timeout) = semantic.timeout_seconds {
                validator = validator.with_timeout(Duration::from_secs(timeout));
            }
            engine.add_validator(Box::new(validator));
        }

        if let Some(dictionary) = &self.dictionary {
            let mut validator = DictionaryApiValidator::new(
                &dictionary.endpoint,
                dictionary.language.as_deref().unwrap_or("fr"),
            );
            if let Some(timeout) = dictionary.timeout_seconds {
                validator = validator.with_timeout(Duration::from_secs(timeout));
            }
            for category in &self.categories {
                if !category.keywords.is_empty() {
                    validator.add_keywords(&category.name, &category.keywords);
                }
            }
            engine.add_validator(Box::new(validator));
        }

        engine
    }

    pub fn build_service(
        &self,
        repository: Arc<InMemoryCategoryRepository>,
        cache: Arc<InMemoryValidationCache>,
    ) -> ValidationService {
        let engine = self.build_engine(cache.clone());
        ValidationService::new(repository, cache, engine)
    }

    /// The categories a round plays, in declaration order. With no
    /// declarations, all enabled predefined categories play.
    pub fn round_categories(&self, repository: &InMemoryCategoryRepository) -> Vec<Category> {
        if self.categories.is_empty() {
            return repository.all().into_iter().filter(|c| c.enabled).collect();
        }
        self.categories
            .iter()
            .filter(|settings| settings.enabled.unwrap_or(true))
            .filter_map(|settings| repository.find_by_name(&normalize(&settings.name)))
            .filter(|category| category.enabled)
            .collect()
    }

    /// One-stop assembly of a playable session from this config.
    pub fn build_session(&self, stats: Arc<GameStatistics>) -> Result<GameSession> {
        let letters = self.letters()?;
        let repository = self.build_repository()?;
        let cache = Arc::new(InMemoryValidationCache::new());
        let categories = self.round_categories(&repository);
        let service = Arc::new(self.build_service(repository, cache));
        let round = Arc::new(RoundEngine::new(service, categories, self.round_seconds()));
        Ok(GameSession::new(round, letters, stats))
    }
}

impl Default for GameConfig {
    /// Built-in offline setup: the predefined categories with small curated
    /// lists, no network stages. Unlisted words fail closed.
    fn default() -> Self {
        let categories = vec![
            CategorySettings {
                name: "animal".to_string(),
                display_name: Some("Animal".to_string()),
                icon: None,
                hint: None,
                enabled: None,
                keywords: ["animal", "mammifère", "oiseau", "poisson", "reptile", "insecte", "espèce"]
                    .map(String::from)
                    .to_vec(),
                words: [
                    "chien", "chat", "cheval", "canard", "chameau", "mouton", "merle", "marmotte",
                    "poule", "pie", "panda", "poney",
                ]
                .map(String::from)
                .to_vec(),
            },
            CategorySettings {
                name: "pays".to_string(),
                display_name: Some("Pays".to_string()),
                icon: None,
                hint: None,
                enabled: None,
                keywords: ["pays", "état", "nation", "république", "royaume"]
                    .map(String::from)
                    .to_vec(),
                words: [
                    "canada", "chili", "chine", "cameroun", "colombie", "maroc", "mexique",
                    "madagascar", "portugal", "pérou", "pologne",
                ]
                .map(String::from)
                .to_vec(),
            },
            CategorySettings {
                name: "ville".to_string(),
                display_name: Some("Ville".to_string()),
                icon: None,
                hint: None,
                enabled: None,
                keywords: ["ville", "commune", "capitale", "cité"].map(String::from).to_vec(),
                words: [
                    "caen", "calais", "cannes", "colmar", "marseille", "metz", "montpellier",
                    "paris", "pau", "perpignan",
                ]
                .map(String::from)
                .to_vec(),
            },
            CategorySettings {
                name: "aliment".to_string(),
                display_name: Some("Aliment".to_string()),
                icon: None,
                hint: None,
                enabled: None,
                keywords: ["aliment", "fruit", "légume", "nourriture", "comestible", "mets"]
                    .map(String::from)
                    .to_vec(),
                words: [
                    "carotte", "chou", "citron", "chocolat", "melon", "miel", "mangue", "pain",
                    "poire", "pomme",
                ]
                .map(String::from)
                .to_vec(),
            },
            CategorySettings {
                name: "metier".to_string(),
                display_name: Some("Métier".to_string()),
                icon: None,
                hint: None,
                enabled: None,
                keywords: ["métier", "profession", "artisan", "ouvrier", "personne qui"]
                    .map(String::from)
                    .to_vec(),
                words: [
                    "chirurgien", "charpentier", "comptable", "cuisinier", "maçon", "médecin",
                    "menuisier", "pompier", "plombier", "professeur",
                ]
                .map(String::from)
                .to_vec(),
            },
        ];

        Self {
            game: GameSettings {
                round_seconds: Some(DEFAULT_ROUND_SECONDS),
                letters: ["C", "P", "M"].map(String::from).to_vec(),
            },
            validation: None,
            semantic: None,
            dictionary: None,
            categories,
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
