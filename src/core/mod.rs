pub mod engine;
pub mod game;
pub mod normalizer;
pub mod round;
pub mod service;
pub mod stats;
pub mod validators;

pub use crate::domain::model::{Category, ValidationResult, ValidationStatus};
pub use crate::domain::ports::{CategoryRepository, ValidationCache, Validator};
pub use crate::utils::error::Result;
