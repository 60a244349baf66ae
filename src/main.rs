use clap::Parser;
use petit_bac::adapters::memory::InMemoryValidationCache;
use petit_bac::utils::{logger, validation::Validate};
use petit_bac::{CliConfig, GameConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting petit-bac");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = if std::path::Path::new(&cli.config).exists() {
        GameConfig::from_file(&cli.config)?
    } else {
        tracing::info!("No config file at '{}', using built-in defaults", cli.config);
        GameConfig::default()
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match (&cli.word, &cli.category) {
        (Some(word), Some(category)) => {
            let repository = config.build_repository()?;
            let cache = Arc::new(InMemoryValidationCache::new());
            let service = config.build_service(repository, cache);

            let result = service.validate_word(category, word).await;
            println!(
                "{} '{}' in '{}': {:?} (confidence {:.2}, via {})",
                if result.is_valid() { "✅" } else { "❌" },
                word,
                category,
                result.status,
                result.confidence,
                result.source
            );
            if !result.details.is_empty() {
                println!("   {}", result.details);
            }
        }
        (None, None) => {
            let repository = config.build_repository()?;
            let categories = config.round_categories(&repository);

            println!("petit-bac letters: {}", config.game.letters.join(", "));
            println!("Round length: {} seconds", config.round_seconds());
            println!("Categories:");
            for category in categories {
                let hint = if category.hint.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", category.hint)
                };
                println!("  {} {}{}", category.icon, category.display_name, hint);
            }
            println!();
            println!("Use --word <mot> --category <catégorie> to validate a single word.");
        }
        _ => {
            eprintln!("❌ --word and --category must be used together");
            std::process::exit(2);
        }
    }

    Ok(())
}
