pub mod cache_lookup;
pub mod dictionary_api;
pub mod semantic_api;
pub mod word_list;

pub use cache_lookup::CacheLookupValidator;
pub use dictionary_api::DictionaryApiValidator;
pub use semantic_api::SemanticApiValidator;
pub use word_list::WordListValidator;
