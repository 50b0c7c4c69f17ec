//! CLI argument structures for the plugdex binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Plugin directory scraper and quality analyzer
#[derive(Parser)]
#[command(name = "plugdex")]
#[command(version = VERSION)]
#[command(about = "Plugdex - Claude Code plugin directory scraper & quality analyzer")]
#[command(long_about = "
Scrape plugin feeds into a merged directory, enrich them with GitHub
metadata, score plugin quality, and export static JSON for site builds.

Common Usage:

  # Scrape all configured sources and export site data
  plugdex scrape

  # Score a local plugin tree
  plugdex quality ./my-plugin

  # Score a plugin straight from its repository
  plugdex quality https://github.com/owner/repo/tree/main/plugins/demo

  # Search the directory (falls back to the local index when the
  # search service is down)
  plugdex search \"docker deploy\"

  # Write a customizable configuration file
  plugdex init-config
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape all configured plugin feeds, merge, enrich, and export
    Scrape(ScrapeArgs),

    /// Generate a quality report for a plugin (local path or GitHub URL)
    Quality(QualityArgs),

    /// Rebuild export artifacts from an existing plugin export
    Export(ExportArgs),

    /// Search the plugin directory
    Search(SearchArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a plugdex configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
pub struct ScrapeArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for exported artifacts (overrides configuration)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Maximum number of plugins to enrich with GitHub metadata
    /// (overrides configuration)
    #[arg(long)]
    pub enrich_limit: Option<usize>,

    /// GitHub API token for higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Skip writing export artifacts after scraping
    #[arg(long)]
    pub no_export: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct QualityArgs {
    /// Plugin to analyze: a local directory or a GitHub repository URL
    /// (a /tree/<branch>/<path> suffix selects a subdirectory)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// GitHub API token for higher rate limits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Existing plugin export to rebuild from (defaults to the
    /// configured export location)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for exported artifacts (overrides configuration)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of results to show
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,

    /// Skip the search service and scan the local index directly
    #[arg(long)]
    pub local: bool,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".plugdex.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Show detailed configuration breakdown
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Markdown report
    Markdown,
    /// Pretty-printed JSON
    Json,
}
