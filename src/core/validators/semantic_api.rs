use crate::domain::model::{Category, ValidationResult};
use crate::domain::ports::Validator;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SOURCE: &str = "semantic-api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

#[derive(Debug, Serialize)]
struct MembershipQuestion {
    #[serde(rename = "chatInput")]
    chat_input: String,
}

/// Answer shapes supported: a bare `{"valid": bool}` from deterministic
/// backends (confidence taken as 1.0), or the richer
/// `{"valid": bool, "confidence": f64, "reasoning": string}`.
#[derive(Debug, Deserialize)]
struct SemanticVerdict {
    valid: bool,
    confidence: Option<f64>,
    reasoning: Option<String>,
}

/// Asks an external semantic service a natural-language membership question.
/// All transport and payload failures are contained here as `Uncertain`, so
/// an unreachable backend degrades the pipeline instead of breaking it.
pub struct SemanticApiValidator {
    client: Client,
    endpoint: String,
    health_endpoint: Option<String>,
    confidence_threshold: f64,
    timeout: Duration,
}

impl SemanticApiValidator {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            health_endpoint: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_health_endpoint(mut self, endpoint: &str) -> Self {
        self.health_endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn question(word: &str, category: &Category) -> String {
        format!(
            "Is '{}' a valid example of the category '{}'?",
            word, category.display_name
        )
    }
}

#[async_trait]
impl Validator for SemanticApiValidator {
    async fn validate(&self, word: &str, category: &Category) -> Result<ValidationResult> {
        let question = Self::question(word, category);
        tracing::debug!("📡 Asking semantic service: {}", question);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&MembershipQuestion {
                chat_input: question,
            })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("📡 Semantic request failed: {}", e);
                return Ok(ValidationResult::uncertain(
                    0.0,
                    SOURCE,
                    format!("request failed: {}", e),
                ));
            }
        };

        if !response.status().is_success() {
            return Ok(ValidationResult::uncertain(
                0.0,
                SOURCE,
                format!("unexpected status: {}", response.status()),
            ));
        }

        let verdict: SemanticVerdict = match response.json().await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!("📡 Malformed semantic response: {}", e);
                return Ok(ValidationResult::uncertain(
                    0.0,
                    SOURCE,
                    format!("malformed response: {}", e),
                ));
            }
        };

        let confidence = verdict.confidence.unwrap_or(1.0);
        if confidence < self.confidence_threshold {
            return Ok(ValidationResult::uncertain(
                confidence,
                SOURCE,
                "confidence below threshold",
            ));
        }

        let details = verdict
            .reasoning
            .unwrap_or_else(|| "semantic verdict".to_string());
        if verdict.valid {
            Ok(ValidationResult::valid(confidence, SOURCE, details))
        } else {
            Ok(ValidationResult::invalid(confidence, SOURCE, details))
        }
    }

    async fn is_available(&self) -> bool {
        let Some(health_endpoint) = &self.health_endpoint else {
            return true;
        };
        match self
            .client
            .get(health_endpoint)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!("📡 Semantic service unhealthy: {}", response.status());
                false
            }
            Err(e) => {
                tracing::warn!("📡 Semantic health check failed: {}", e);
                false
            }
        }
    }

    fn source_name(&self) -> &str {
        SOURCE
    }
}
