//! Plugin manifest parsing and component detection.
//!
//! A Claude Code plugin tree carries its commands, agents, and hooks as
//! markdown files under conventional directories, plus an optional
//! `.mcp.json` describing MCP servers.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::scrape::normalize::AuthorField;

/// Counts of the components a plugin ships.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PluginComponents {
    /// Commands (`commands/*.md`)
    pub commands: usize,
    /// Agents (`agents/*.md`)
    pub agents: usize,
    /// Hooks (`hooks/*.md` + `hooks/*.py`)
    pub hooks: usize,
    /// MCP servers (`.mcp.json` entries)
    pub mcp_servers: usize,
}

/// Metadata parsed from a plugin's `plugin.json` manifest.
#[derive(Debug, Clone, Default)]
pub struct PluginManifest {
    /// Plugin name; falls back to the directory name when absent
    pub name: Option<String>,
    /// Version string
    pub version: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Author display name
    pub author_name: String,
    /// Author profile URL
    pub author_url: String,
}

/// Raw manifest shape: the author field is a string or an object, same as
/// in feed records.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    author: Option<AuthorField>,
}

/// Parse `plugin.json` at the root of a plugin tree. Returns an empty
/// manifest when the file is absent or unparseable.
pub fn parse_manifest(plugin_path: &Path) -> PluginManifest {
    let manifest_path = plugin_path.join("plugin.json");

    let Ok(content) = std::fs::read_to_string(&manifest_path) else {
        return PluginManifest::default();
    };

    match serde_json::from_str::<RawManifest>(&content) {
        Ok(raw) => {
            let (author_name, author_url) = raw
                .author
                .map(AuthorField::into_parts)
                .unwrap_or_default();
            PluginManifest {
                name: raw.name,
                version: raw.version,
                description: raw.description,
                author_name,
                author_url,
            }
        }
        Err(e) => {
            debug!(path = %manifest_path.display(), error = %e, "Unparseable plugin.json");
            PluginManifest::default()
        }
    }
}

/// Count files directly inside `dir` with the given extension.
fn count_files_with_ext(dir: &Path, ext: &str) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    entries
        .flatten()
        .filter(|entry| {
            let path = entry.path();
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext)
        })
        .count()
}

/// Detect plugin components by directory convention.
pub fn detect_components(plugin_path: &Path) -> PluginComponents {
    let mut components = PluginComponents {
        commands: count_files_with_ext(&plugin_path.join("commands"), "md"),
        agents: count_files_with_ext(&plugin_path.join("agents"), "md"),
        hooks: count_files_with_ext(&plugin_path.join("hooks"), "md")
            + count_files_with_ext(&plugin_path.join("hooks"), "py"),
        mcp_servers: 0,
    };

    let mcp_path = plugin_path.join(".mcp.json");
    if let Ok(content) = std::fs::read_to_string(&mcp_path) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&content) {
            components.mcp_servers = map.len();
        }
    }

    components
}
