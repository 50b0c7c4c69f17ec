//! Scraper orchestrator: fetch, normalize, merge, enrich.
//!
//! Sources are processed strictly sequentially in descending priority
//! order. One bad source never aborts the run; it just contributes zero
//! records. Enrichment only touches a bounded prefix of the merged set to
//! stay under GitHub rate limits, and runs sequentially for the same
//! reason.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::core::config::PlugdexConfig;
use crate::core::errors::{PlugdexError, Result};
use crate::scrape::enrich::GithubEnricher;
use crate::scrape::normalize::{normalize, CanonicalPlugin, RawFeedRecord};
use crate::scrape::sources::{PluginSource, SourceFormat};

/// Orchestrates the scrape pipeline across all configured sources.
pub struct PluginScraper {
    client: reqwest::Client,
    enricher: GithubEnricher,
    sources: Vec<PluginSource>,
    repo_template: String,
    enrich_limit: usize,
}

impl PluginScraper {
    /// Build a scraper from the pipeline configuration.
    pub fn new(config: &PlugdexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.scraper.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.scraper.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            enricher: GithubEnricher::new(config)?,
            sources: config.scraper.sources.clone(),
            repo_template: config.scraper.source_repo_template.clone(),
            enrich_limit: config.scraper.enrich_limit,
        })
    }

    /// Scrape all configured sources and return the merged plugin list.
    ///
    /// Sources are visited in descending priority order; records merge
    /// into a slug-keyed map where higher-priority fields win and
    /// lower-priority sources only backfill blanks. The leading
    /// `enrich_limit` plugins are then enriched sequentially.
    pub async fn scrape_all(&self) -> Vec<CanonicalPlugin> {
        let mut plugins = self.scrape_merged().await;

        // Sequential by design: GitHub rate limits, not throughput, are
        // the binding constraint here.
        let limit = self.enrich_limit.min(plugins.len());
        for plugin in plugins.iter_mut().take(limit) {
            self.enrich(plugin).await;
        }

        plugins
    }

    /// Scrape and merge all sources without the enrichment pass. Callers
    /// that want per-plugin progress drive [`Self::enrich`] themselves.
    pub async fn scrape_merged(&self) -> Vec<CanonicalPlugin> {
        let mut merged: IndexMap<String, CanonicalPlugin> = IndexMap::new();

        let mut ordered: Vec<&PluginSource> = self.sources.iter().collect();
        ordered.sort_by_key(|s| std::cmp::Reverse(s.priority));

        for source in ordered {
            info!(source = %source.name, url = %source.url, "Scraping source");

            match self.scrape_source(source).await {
                Ok(plugins) => {
                    let count = plugins.len();
                    for plugin in plugins {
                        match merged.get_mut(&plugin.slug) {
                            Some(existing) => existing.backfill_from(&plugin),
                            None => {
                                merged.insert(plugin.slug.clone(), plugin);
                            }
                        }
                    }
                    info!(source = %source.name, count, "Scraped plugins");
                }
                Err(e) => {
                    error!(source = %source.name, error = %e, "Failed to scrape source");
                }
            }
        }

        merged.into_values().collect()
    }

    /// Enrich one plugin with GitHub metadata.
    pub async fn enrich(&self, plugin: &mut CanonicalPlugin) {
        self.enricher.enrich(plugin).await;
    }

    /// Scrape and normalize a single source.
    pub async fn scrape_source(&self, source: &PluginSource) -> Result<Vec<CanonicalPlugin>> {
        match source.format {
            SourceFormat::RawJson => self.scrape_raw_json(source).await,
            SourceFormat::RepoApi => {
                // Reserved for API-driven listings; contributes nothing yet.
                warn!(source = %source.name, "Repo API scraping not implemented");
                Ok(Vec::new())
            }
        }
    }

    async fn scrape_raw_json(&self, source: &PluginSource) -> Result<Vec<CanonicalPlugin>> {
        let response = self
            .client
            .get(&source.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| PlugdexError::fetch_http(&source.name, "request failed", e))?;

        let response = response
            .error_for_status()
            .map_err(|e| PlugdexError::fetch_http(&source.name, "non-success status", e))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| PlugdexError::fetch_http(&source.name, "invalid JSON payload", e))?;

        Ok(parse_feed_payload(&payload, source, &self.repo_template))
    }

    /// Number of plugins that will be enriched per run.
    pub fn enrich_limit(&self) -> usize {
        self.enrich_limit
    }
}

/// Normalize every record in a feed payload.
///
/// Accepts a bare JSON array or an object with a `plugins` key; any other
/// shape contributes nothing and logs a warning. Individual records that
/// fail to decode or lack a name are dropped without affecting the rest.
pub fn parse_feed_payload(
    payload: &Value,
    source: &PluginSource,
    repo_template: &str,
) -> Vec<CanonicalPlugin> {
    let raw_entries = match payload {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(map) => match map.get("plugins").and_then(Value::as_array) {
            Some(entries) => entries.as_slice(),
            None => {
                warn!(source = %source.name, "Unknown JSON structure");
                return Vec::new();
            }
        },
        _ => {
            warn!(source = %source.name, "Unknown JSON structure");
            return Vec::new();
        }
    };

    let mut plugins = Vec::with_capacity(raw_entries.len());
    for entry in raw_entries {
        let raw: RawFeedRecord = match serde_json::from_value(entry.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(source = %source.name, error = %e, "Failed to decode feed record");
                continue;
            }
        };

        if let Some(plugin) = normalize(raw, source, repo_template) {
            plugins.push(plugin);
        }
    }

    plugins
}
