pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::GameConfig;

pub use crate::core::engine::ValidationEngine;
pub use crate::core::game::{GameSession, NextStep};
pub use crate::core::round::RoundEngine;
pub use crate::core::service::ValidationService;
pub use crate::core::stats::GameStatistics;
pub use domain::model::{
    Category, FinishTrigger, GameSummary, RoundOutcome, RoundState, ValidationResult,
    ValidationStatus,
};
pub use utils::error::{GameError, Result};
