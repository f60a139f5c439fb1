//! Squish CLI - shrink images to a tenth of their size.
//!
//! Every image is resized to fit within 1920px and re-encoded at the highest
//! quality that lands within 10% of the original byte size. Results are
//! written next to each other in an output directory and, on request,
//! bundled into a single zip archive.
//!
//! # Usage
//!
//! ```bash
//! # Compress a few files into ~/Downloads/squish
//! squish compress a.png b.jpg
//!
//! # Compress a directory tree, archive only, report as JSON Lines
//! squish compress ./photos --recursive --zip --no-files -f jsonl
//!
//! # View configuration
//! squish config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Squish - budget-driven image compression.
#[derive(Parser, Debug)]
#[command(name = "squish")]
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
    /// Compress images and write the results
    Compress(cli::compress::CompressArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match squish_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `squish config path`."
            );
            squish_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Squish v{}", squish_core::VERSION);

    match cli.command {
        Commands::Compress(args) => cli::compress::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config),
    }
}
