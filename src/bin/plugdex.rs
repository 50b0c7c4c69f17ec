//! Plugdex CLI - Claude Code plugin directory scraper & quality analyzer
//!
//! Scrapes plugin feeds into a merged directory, enriches plugins with
//! GitHub metadata, scores plugin quality, exports static site data, and
//! searches the directory with a local fallback.

use clap::Parser;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scrape(args) => {
            cli::scrape_command(args).await?;
        }
        Commands::Quality(args) => {
            cli::quality_command(args).await?;
        }
        Commands::Export(args) => {
            cli::export_command(args).await?;
        }
        Commands::Search(args) => {
            cli::search_command(args).await?;
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config().await?;
        }
        Commands::InitConfig(args) => {
            cli::init_config(args).await?;
        }
        Commands::ValidateConfig(args) => {
            cli::validate_config(args).await?;
        }
    }

    Ok(())
}
