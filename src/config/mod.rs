#[cfg(feature = "cli")]
pub mod cli;
pub mod game_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use game_config::GameConfig;
