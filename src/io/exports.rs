//! Static JSON export: the full plugin data file consumed by site builds
//! and the slim search index consumed by the client-side fallback.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::ExportConfig;
use crate::core::errors::{PlugdexError, Result};
use crate::scrape::normalize::CanonicalPlugin;

/// Top-level shape of the full plugin export.
#[derive(Debug, Serialize, Deserialize)]
pub struct PluginsExport {
    /// Export timestamp
    pub generated_at: DateTime<Utc>,
    /// Number of plugins in the export
    pub count: usize,
    /// All merged plugins
    pub plugins: Vec<CanonicalPlugin>,
}

/// One slim record in the search index. Carries only the fields the
/// search UI renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexEntry {
    /// URL-safe identifier
    pub slug: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Category label
    pub category: String,
    /// Author display name
    pub author: String,
    /// GitHub star count, zero when unknown
    pub stars: u64,
    /// Came from an official source
    pub verified: bool,
}

impl From<&CanonicalPlugin> for SearchIndexEntry {
    fn from(plugin: &CanonicalPlugin) -> Self {
        Self {
            slug: plugin.slug.clone(),
            name: plugin.name.clone(),
            description: plugin.description.clone(),
            category: plugin.category.as_str().to_string(),
            author: plugin.author_name.clone(),
            stars: plugin.github_stars.unwrap_or(0),
            verified: plugin.is_verified,
        }
    }
}

/// Directory that holds the exported JSON data files.
pub fn data_dir(config: &ExportConfig) -> PathBuf {
    config.output_dir.join(&config.data_subdir)
}

/// Path of the search index file under the export directory.
pub fn search_index_path(config: &ExportConfig) -> PathBuf {
    data_dir(config).join(&config.search_index_file)
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .map_err(|e| PlugdexError::io(format!("Failed to write export: {}", path.display()), e))
}

/// Write the full plugin export. Returns the written path.
pub fn export_plugins(plugins: &[CanonicalPlugin], config: &ExportConfig) -> Result<PathBuf> {
    let dir = data_dir(config);
    std::fs::create_dir_all(&dir).map_err(|e| {
        PlugdexError::io(format!("Failed to create export dir: {}", dir.display()), e)
    })?;

    let export = PluginsExport {
        generated_at: Utc::now(),
        count: plugins.len(),
        plugins: plugins.to_vec(),
    };

    let path = dir.join(&config.plugins_file);
    write_json(&path, &export)?;
    info!(path = %path.display(), count = export.count, "Wrote plugin export");
    Ok(path)
}

/// Write the slim search index, ordered by star count descending so the
/// fallback search returns popular plugins first. Returns the written path.
pub fn export_search_index(plugins: &[CanonicalPlugin], config: &ExportConfig) -> Result<PathBuf> {
    let dir = data_dir(config);
    std::fs::create_dir_all(&dir).map_err(|e| {
        PlugdexError::io(format!("Failed to create export dir: {}", dir.display()), e)
    })?;

    let mut entries: Vec<SearchIndexEntry> = plugins.iter().map(SearchIndexEntry::from).collect();
    entries.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.name.cmp(&b.name)));

    let path = dir.join(&config.search_index_file);
    write_json(&path, &entries)?;
    info!(path = %path.display(), count = entries.len(), "Wrote search index");
    Ok(path)
}

/// Write both export artifacts. Returns the (plugins, index) paths.
pub fn export_site_data(
    plugins: &[CanonicalPlugin],
    config: &ExportConfig,
) -> Result<(PathBuf, PathBuf)> {
    let plugins_path = export_plugins(plugins, config)?;
    let index_path = export_search_index(plugins, config)?;
    Ok((plugins_path, index_path))
}
