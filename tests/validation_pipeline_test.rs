use httpmock::prelude::*;
use petit_bac::adapters::memory::{InMemoryCategoryRepository, InMemoryValidationCache};
use petit_bac::core::validators::{
    CacheLookupValidator, DictionaryApiValidator, SemanticApiValidator, WordListValidator,
};
use petit_bac::core::ValidationCache;
use petit_bac::{GameConfig, ValidationEngine, ValidationService, ValidationStatus};
use std::sync::Arc;
use std::time::Duration;

fn dictionary_entry(word: &str, definition: &str) -> serde_json::Value {
    serde_json::json!([{
        "word": word,
        "meanings": [{
            "partOfSpeech": "noun",
            "definitions": [{"definition": definition}]
        }]
    }])
}

#[tokio::test]
async fn test_escalation_reaches_dictionary_and_caches_the_verdict() {
    let server = MockServer::start();

    // Semantic backend is unsure about this word.
    let semantic_mock = server.mock(|when, then| {
        when.method(POST).path("/semantic");
        then.status(200)
            .json_body(serde_json::json!({"valid": true, "confidence": 0.3}));
    });
    let dictionary_mock = server.mock(|when, then| {
        when.method(GET).path("/entries/fr/axolotl");
        then.status(200).json_body(dictionary_entry(
            "axolotl",
            "Amphibien du Mexique, animal aquatique.",
        ));
    });

    let repository = Arc::new(InMemoryCategoryRepository::with_defaults());
    let cache = Arc::new(InMemoryValidationCache::new());
    let engine = ValidationEngine::new()
        .with_validator(Box::new(CacheLookupValidator::new(cache.clone())))
        .with_validator(Box::new(
            WordListValidator::new().with_list("animal", ["chien", "chat"]),
        ))
        .with_validator(Box::new(SemanticApiValidator::new(
            &server.url("/semantic"),
        )))
        .with_validator(Box::new(
            DictionaryApiValidator::new(&server.base_url(), "fr")
                .with_keywords("animal", ["animal", "mammifère", "amphibien"]),
        ));
    let service = ValidationService::new(repository, cache.clone(), engine);

    let result = service.validate_word("animal", "Axolotl").await;
    assert_eq!(result.status, ValidationStatus::Valid);
    assert_eq!(result.source, "dictionary");
    semantic_mock.assert_hits(1);
    dictionary_mock.assert_hits(1);

    // The confirmed pair was persisted: the repeat answer comes from the
    // cache fast path with full confidence and no further network traffic.
    assert!(cache.has("axolotl", "animal").await.unwrap());
    let repeat = service.validate_word("animal", "axolotl").await;
    assert_eq!(repeat.status, ValidationStatus::Valid);
    assert_eq!(repeat.confidence, 1.0);
    assert_eq!(repeat.source, "cache");
    semantic_mock.assert_hits(1);
    dictionary_mock.assert_hits(1);
}

#[tokio::test]
async fn test_listed_word_needs_no_network_at_all() {
    let server = MockServer::start();
    let semantic_mock = server.mock(|when, then| {
        when.method(POST).path("/semantic");
        then.status(200).json_body(serde_json::json!({"valid": true}));
    });
    let dictionary_mock = server.mock(|when, then| {
        when.method(GET).path_includes("/entries/");
        then.status(404);
    });

    let config = GameConfig::from_toml_str(&format!(
        r#"
[game]
letters = ["C"]

[semantic]
endpoint = "{semantic}"

[dictionary]
endpoint = "{dictionary}"

[[categories]]
name = "animal"
words = ["chien", "chat"]
"#,
        semantic = server.url("/semantic"),
        dictionary = server.base_url(),
    ))
    .unwrap();

    let repository = config.build_repository().unwrap();
    let cache = Arc::new(InMemoryValidationCache::new());
    let service = config.build_service(repository, cache);

    let result = service.validate_word("animal", "chien").await;
    assert_eq!(result.status, ValidationStatus::Valid);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.source, "deterministic-list");
    semantic_mock.assert_hits(0);
    dictionary_mock.assert_hits(0);
}

#[tokio::test]
async fn test_semantic_timeout_falls_through_to_dictionary() {
    let server = MockServer::start();

    let semantic_mock = server.mock(|when, then| {
        when.method(POST).path("/semantic");
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(serde_json::json!({"valid": false}));
    });
    let dictionary_mock = server.mock(|when, then| {
        when.method(GET).path("/entries/fr/chameau");
        then.status(200).json_body(dictionary_entry(
            "chameau",
            "Mammifère ruminant à deux bosses.",
        ));
    });

    let repository = Arc::new(InMemoryCategoryRepository::with_defaults());
    let cache = Arc::new(InMemoryValidationCache::new());
    let engine = ValidationEngine::new()
        .with_validator(Box::new(
            SemanticApiValidator::new(&server.url("/semantic"))
                .with_timeout(Duration::from_millis(100)),
        ))
        .with_validator(Box::new(
            DictionaryApiValidator::new(&server.base_url(), "fr")
                .with_keywords("animal", ["mammifère"]),
        ));
    let service = ValidationService::new(repository, cache, engine);

    let result = service.validate_word("animal", "chameau").await;
    assert_eq!(result.status, ValidationStatus::Valid);
    assert_eq!(result.source, "dictionary");
    semantic_mock.assert_hits(1);
    dictionary_mock.assert_hits(1);
}

#[tokio::test]
async fn test_unhealthy_semantic_backend_is_skipped_without_a_request() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(503);
    });
    let semantic_mock = server.mock(|when, then| {
        when.method(POST).path("/semantic");
        then.status(200).json_body(serde_json::json!({"valid": true}));
    });
    let dictionary_mock = server.mock(|when, then| {
        when.method(GET).path("/entries/fr/girafe");
        then.status(200).json_body(dictionary_entry(
            "girafe",
            "Grand mammifère d'Afrique au long cou.",
        ));
    });

    let repository = Arc::new(InMemoryCategoryRepository::with_defaults());
    let cache = Arc::new(InMemoryValidationCache::new());
    let engine = ValidationEngine::new()
        .with_validator(Box::new(
            SemanticApiValidator::new(&server.url("/semantic"))
                .with_health_endpoint(&server.url("/health")),
        ))
        .with_validator(Box::new(
            DictionaryApiValidator::new(&server.base_url(), "fr")
                .with_keywords("animal", ["mammifère"]),
        ));
    let service = ValidationService::new(repository, cache, engine);

    let result = service.validate_word("animal", "girafe").await;
    assert_eq!(result.status, ValidationStatus::Valid);
    assert_eq!(result.source, "dictionary");
    semantic_mock.assert_hits(0);
    dictionary_mock.assert_hits(1);
}

#[tokio::test]
async fn test_nonsense_word_is_rejected_fail_closed() {
    let server = MockServer::start();

    // Semantic backend errors out; dictionary has never heard of the word.
    server.mock(|when, then| {
        when.method(POST).path("/semantic");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/entries/fr/zzxqp");
        then.status(404)
            .json_body(serde_json::json!({"title": "No Definitions Found"}));
    });

    let config = GameConfig::from_toml_str(&format!(
        r#"
[game]
letters = ["Z"]

[semantic]
endpoint = "{semantic}"

[dictionary]
endpoint = "{dictionary}"
language = "fr"

[[categories]]
name = "animal"
words = ["zébu"]
keywords = ["animal", "mammifère"]
"#,
        semantic = server.url("/semantic"),
        dictionary = server.base_url(),
    ))
    .unwrap();

    let repository = config.build_repository().unwrap();
    let cache = Arc::new(InMemoryValidationCache::new());
    let service = config.build_service(repository, cache);

    // The dictionary's not-found verdict carries no confidence, so the
    // reject ultimately comes from the fail-closed resolver.
    let result = service.validate_word("animal", "zzxqp").await;
    assert_eq!(result.status, ValidationStatus::Invalid);
    assert_eq!(result.source, "resolver-fallback");
    assert_eq!(result.confidence, 0.5);
}

#[tokio::test]
async fn test_all_stages_inconclusive_resolves_to_reject() {
    // No network stages at all and a word outside the curated list: the
    // engine must fail closed rather than surface ambiguity.
    let config = GameConfig::default();
    let repository = config.build_repository().unwrap();
    let cache = Arc::new(InMemoryValidationCache::new());
    let service = config.build_service(repository, cache);

    let result = service.validate_word("animal", "axolotl").await;
    assert_eq!(result.status, ValidationStatus::Invalid);
    assert_eq!(result.source, "resolver-fallback");
    assert_eq!(result.confidence, 0.5);
}

#[tokio::test]
async fn test_unknown_category_is_a_configuration_error() {
    let config = GameConfig::default();
    let repository = config.build_repository().unwrap();
    let cache = Arc::new(InMemoryValidationCache::new());
    let service = config.build_service(repository, cache);

    let result = service.validate_word("galaxie", "centaure").await;
    assert_eq!(result.status, ValidationStatus::Error);
    assert_eq!(result.source, "service");
}
