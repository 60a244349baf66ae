use crate::domain::model::{Category, ValidationResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One independent technique for deciding whether a word belongs to a
/// category. Strategies never panic upward: expected failures (network,
/// timeouts, malformed payloads) are mapped to an `Uncertain` result, and an
/// `Err` return is treated by the engine as "no usable result".
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, word: &str, category: &Category) -> Result<ValidationResult>;

    /// Lets the engine skip a strategy entirely without invoking it, e.g. a
    /// health-checked remote dependency reporting unhealthy.
    async fn is_available(&self) -> bool {
        true
    }

    fn source_name(&self) -> &str;
}

/// Read-only lookup of categories by normalized internal name.
pub trait CategoryRepository: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<Category>;
    fn all(&self) -> Vec<Category>;
}

/// Store of (normalized word, category name) pairs already confirmed valid.
/// `put` is idempotent; entries are never deleted by the validation core.
#[async_trait]
pub trait ValidationCache: Send + Sync {
    async fn has(&self, word: &str, category: &str) -> Result<bool>;
    async fn put(&self, word: &str, category: &str) -> Result<()>;
}
