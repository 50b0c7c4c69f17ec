//! Configuration types and management for plugdex.
//!
//! Global settings (API tokens, base URLs, source lists) live in one
//! explicit configuration struct constructed at startup and threaded
//! through components rather than read from ambient global state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{PlugdexError, Result};
use crate::scrape::sources::PluginSource;

/// Main configuration for the plugdex pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlugdexConfig {
    /// Feed scraping and enrichment settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// GitHub API settings
    #[serde(default)]
    pub github: GithubConfig,

    /// External search service settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Static export settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for PlugdexConfig {
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            github: GithubConfig::default(),
            search: SearchConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PlugdexConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            PlugdexError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            PlugdexError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scraper.enrich_limit == 0 {
            return Err(PlugdexError::config_field(
                "enrichment limit must be greater than zero",
                "scraper.enrich_limit",
            ));
        }

        if self.scraper.timeout_secs == 0 {
            return Err(PlugdexError::config_field(
                "HTTP timeout must be greater than zero",
                "scraper.timeout_secs",
            ));
        }

        if self.scraper.sources.is_empty() {
            return Err(PlugdexError::config_field(
                "at least one plugin source is required",
                "scraper.sources",
            ));
        }

        for source in &self.scraper.sources {
            if url::Url::parse(&source.url).is_err() {
                return Err(PlugdexError::config_field(
                    format!("source '{}' has an invalid URL: '{}'", source.name, source.url),
                    "scraper.sources",
                ));
            }
        }

        if !self.scraper.source_repo_template.contains("{path}") {
            return Err(PlugdexError::config_field(
                "repository template must contain a {path} placeholder",
                "scraper.source_repo_template",
            ));
        }

        Ok(())
    }
}

/// Feed scraping and enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User agent sent with all outbound HTTP requests
    pub user_agent: String,

    /// Request timeout in seconds for feed and API fetches
    pub timeout_secs: u64,

    /// Maximum number of merged plugins to enrich with GitHub metadata.
    /// Enrichment is sequential and rate-sensitive, so only the leading
    /// slice of the merged result set is enriched.
    pub enrich_limit: usize,

    /// URL template for synthesizing repository URLs from relative
    /// `./plugins/<name>` source paths in feed records. `{path}` is
    /// replaced with the plugin's directory name.
    pub source_repo_template: String,

    /// Plugin feed sources, merged in descending priority order
    #[serde(default = "PluginSource::default_registry")]
    pub sources: Vec<PluginSource>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("plugdex/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            enrich_limit: 50,
            source_repo_template:
                "https://github.com/jeremylongshore/claude-code-plugins-plus-skills/tree/main/plugins/{path}"
                    .to_string(),
            sources: PluginSource::default_registry(),
        }
    }
}

/// GitHub API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the GitHub REST API
    pub api_base: String,

    /// Optional bearer token for higher rate limits. Not serialized back
    /// out to config files.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

/// External search service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search service base URL
    pub url: String,

    /// Search service API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Timeout in milliseconds before falling back to the local index
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7700".to_string(),
            api_key: None,
            timeout_ms: 2000,
        }
    }
}

/// Static export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root output directory for exported artifacts
    pub output_dir: PathBuf,

    /// Subdirectory under the output root for JSON data files
    pub data_subdir: String,

    /// File name for the full plugin data export
    pub plugins_file: String,

    /// File name for the slim client-side search index
    pub search_index_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
            data_subdir: "data".to_string(),
            plugins_file: "plugins.json".to_string(),
            search_index_file: "search-index.json".to_string(),
        }
    }
}
