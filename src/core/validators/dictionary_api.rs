use crate::core::normalizer::normalize;
use crate::domain::model::{Category, ValidationResult};
use crate::domain::ports::Validator;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const SOURCE: &str = "dictionary";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const BASE_CONFIDENCE: f64 = 0.75;
const CONFIDENCE_PER_EXTRA_KEYWORD: f64 = 0.02;
const MAX_CONFIDENCE: f64 = 0.85;

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    word: String,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: String,
}

/// Last escalation stage: confirms the word exists in a public dictionary
/// and scans its definitions for category keywords. Unlike the earlier
/// stages this one can produce a definitive `Invalid` (word not found, or
/// found with no category keyword in any definition).
pub struct DictionaryApiValidator {
    client: Client,
    base_url: String,
    language: String,
    timeout: Duration,
    keywords: HashMap<String, Vec<String>>,
}

impl DictionaryApiValidator {
    pub fn new(base_url: &str, language: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            timeout: DEFAULT_TIMEOUT,
            keywords: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers the keyword set scanned against definition text for a
    /// category. Keywords are normalized at load.
    pub fn add_keywords<I, S>(&mut self, category: &str, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.keywords.entry(normalize(category)).or_default();
        for keyword in keywords {
            let keyword = normalize(keyword.as_ref());
            if !keyword.is_empty() && !entry.contains(&keyword) {
                entry.push(keyword);
            }
        }
    }

    pub fn with_keywords<I, S>(mut self, category: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_keywords(category, keywords);
        self
    }

    fn lookup_url(&self, word: &str) -> String {
        format!("{}/entries/{}/{}", self.base_url, self.language, word)
    }

    /// Counts distinct category keywords appearing in the definition text.
    fn count_keyword_matches(&self, category: &Category, definitions: &str) -> usize {
        self.keywords
            .get(&category.name)
            .map(|keywords| {
                keywords
                    .iter()
                    .filter(|keyword| definitions.contains(keyword.as_str()))
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl Validator for DictionaryApiValidator {
    async fn validate(&self, word: &str, category: &Category) -> Result<ValidationResult> {
        let word = normalize(word);
        let url = self.lookup_url(&word);
        tracing::debug!("📖 Dictionary lookup: {}", url);

        let response = match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("📖 Dictionary request failed: {}", e);
                return Ok(ValidationResult::uncertain(
                    0.5,
                    SOURCE,
                    format!("request failed: {}", e),
                ));
            }
        };

        let status = response.status();
        if status.is_client_error() {
            return Ok(ValidationResult::invalid(0.0, SOURCE, "word not found"));
        }
        if !status.is_success() {
            return Ok(ValidationResult::uncertain(
                0.5,
                SOURCE,
                format!("unexpected status: {}", status),
            ));
        }

        let entries: Vec<DictionaryEntry> = match response.json().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("📖 Malformed dictionary response: {}", e);
                return Ok(ValidationResult::uncertain(
                    0.5,
                    SOURCE,
                    format!("malformed response: {}", e),
                ));
            }
        };

        // Existence requires both a word identity and at least one meaning.
        let exists = entries
            .iter()
            .any(|entry| !entry.word.is_empty() && !entry.meanings.is_empty());
        if !exists {
            return Ok(ValidationResult::invalid(0.0, SOURCE, "word not found"));
        }

        let definitions = normalize(
            &entries
                .iter()
                .flat_map(|entry| &entry.meanings)
                .flat_map(|meaning| &meaning.definitions)
                .map(|definition| definition.definition.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        );

        let matches = self.count_keyword_matches(category, &definitions);
        if matches == 0 {
            return Ok(ValidationResult::invalid(
                0.0,
                SOURCE,
                "definition does not mention the category",
            ));
        }

        let confidence = (BASE_CONFIDENCE + CONFIDENCE_PER_EXTRA_KEYWORD * (matches - 1) as f64)
            .min(MAX_CONFIDENCE);
        Ok(ValidationResult::valid(
            confidence,
            SOURCE,
            format!("{} category keyword(s) in definitions", matches),
        ))
    }

    fn source_name(&self) -> &str {
        SOURCE
    }
}
