//! Documentation check: additive scoring for standard docs and component
//! documentation coverage.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::quality::components::PluginComponents;

/// Documentation assessment results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentationCheck {
    /// Sub-score in [0, 100]
    pub score: i32,
    /// README present
    pub has_readme: bool,
    /// CHANGELOG present
    pub has_changelog: bool,
    /// LICENSE present
    pub has_license: bool,
    /// CONTRIBUTING present
    pub has_contributing: bool,
    /// `commands/*.md` doc count
    pub command_docs: usize,
    /// `agents/*.md` doc count
    pub agent_docs: usize,
    /// Gaps found
    pub issues: Vec<String>,
}

fn any_exists(plugin_path: &Path, names: &[&str]) -> bool {
    names.iter().any(|name| plugin_path.join(name).exists())
}

fn count_md(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .filter(|entry| {
            let path = entry.path();
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md")
        })
        .count()
}

/// Assess documentation quality of a plugin tree.
///
/// Additive scoring: README +40, CHANGELOG +15, LICENSE +15,
/// CONTRIBUTING +10, plus +10 each when command/agent docs cover the
/// detected component counts.
pub fn check_documentation(plugin_path: &Path, components: &PluginComponents) -> DocumentationCheck {
    let mut docs = DocumentationCheck {
        has_readme: any_exists(plugin_path, &["README.md", "readme.md"]),
        has_changelog: any_exists(plugin_path, &["CHANGELOG.md", "changelog.md"]),
        has_license: any_exists(plugin_path, &["LICENSE", "LICENSE.md"]),
        has_contributing: any_exists(plugin_path, &["CONTRIBUTING.md"]),
        command_docs: count_md(&plugin_path.join("commands")),
        agent_docs: count_md(&plugin_path.join("agents")),
        ..DocumentationCheck::default()
    };

    let mut score = 0;

    if docs.has_readme {
        score += 40;
    } else {
        docs.issues.push("Missing README.md".to_string());
    }

    if docs.has_changelog {
        score += 15;
    } else {
        docs.issues.push("Missing CHANGELOG.md".to_string());
    }

    if docs.has_license {
        score += 15;
    } else {
        docs.issues.push("Missing LICENSE file".to_string());
    }

    if docs.has_contributing {
        score += 10;
    }

    if components.commands > 0 {
        if docs.command_docs >= components.commands {
            score += 10;
        } else {
            docs.issues.push(format!(
                "Only {}/{} commands documented",
                docs.command_docs, components.commands
            ));
        }
    }

    if components.agents > 0 {
        if docs.agent_docs >= components.agents {
            score += 10;
        } else {
            docs.issues.push(format!(
                "Only {}/{} agents documented",
                docs.agent_docs, components.agents
            ));
        }
    }

    docs.score = score.min(100);
    docs
}
