use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "petit-bac")]
#[command(about = "Timed word-category game with a layered validation pipeline")]
pub struct CliConfig {
    #[arg(long, default_value = "petit-bac.toml")]
    pub config: String,

    #[arg(long, help = "Validate a single word and exit (requires --category)")]
    pub word: Option<String>,

    #[arg(long, help = "Category to validate --word against")]
    pub category: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
