use crate::core::normalizer::normalize;
use crate::domain::model::{Category, ValidationResult};
use crate::domain::ports::{ValidationCache, Validator};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub const SOURCE: &str = "cache";

/// Confidence granted to a cache hit inside the pipeline. A hit means the
/// pair was confirmed valid in an earlier session.
const HIT_CONFIDENCE: f64 = 0.90;

/// First stage of the pipeline: answers instantly from previously confirmed
/// (word, category) pairs. A miss is not evidence of invalidity, so this
/// strategy never returns `Invalid`.
pub struct CacheLookupValidator {
    cache: Arc<dyn ValidationCache>,
}

impl CacheLookupValidator {
    pub fn new(cache: Arc<dyn ValidationCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Validator for CacheLookupValidator {
    async fn validate(&self, word: &str, category: &Category) -> Result<ValidationResult> {
        let word = normalize(word);
        match self.cache.has(&word, &category.name).await {
            Ok(true) => Ok(ValidationResult::valid(
                HIT_CONFIDENCE,
                SOURCE,
                "previously confirmed",
            )),
            Ok(false) => Ok(ValidationResult::uncertain(0.0, SOURCE, "not cached")),
            Err(e) => {
                tracing::warn!("Cache lookup failed for '{}': {}", word, e);
                Ok(ValidationResult::uncertain(
                    0.0,
                    SOURCE,
                    format!("cache lookup failed: {}", e),
                ))
            }
        }
    }

    fn source_name(&self) -> &str {
        SOURCE
    }
}
