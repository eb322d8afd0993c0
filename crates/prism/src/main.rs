//! Prism CLI - derive image variants and dominant colors.
//!
//! Prism takes a single source image (local path or URL) and writes a set of
//! resized, re-encoded variants - retina and standard renditions, optionally
//! with `.webp` siblings - and extracts the image's dominant color.
//!
//! # Usage
//!
//! ```bash
//! # Derive the preset variants
//! prism process hero.jpg --dir ./out --name hero
//!
//! # Retina/standard pair at a base size
//! prism retinify hero.jpg --width 540 --height 470 --dir ./out --name hero
//!
//! # Dominant color only
//! prism color https://example.com/hero.jpg
//!
//! # View configuration
//! prism config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Prism - derive retina/standard image variants and dominant colors.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the configured variants from a source image
    Process(cli::process::ProcessArgs),

    /// Derive a retina/standard pair at a base size
    Retinify(cli::retinify::RetinifyArgs),

    /// Extract the dominant color without writing files
    Color(cli::color::ColorArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match prism_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `prism config path`."
            );
            prism_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Process(args) => cli::process::execute(args).await,
        Commands::Retinify(args) => cli::retinify::execute(args).await,
        Commands::Color(args) => cli::color::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
