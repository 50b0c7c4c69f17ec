//! Plugin feed source registry and keyword-based categorization.
//!
//! Sources are defined at process start and never mutated; their priority
//! breaks ties when the same plugin appears in multiple feeds (higher
//! priority wins, lower-priority sources only backfill blanks).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire format of a remote plugin feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// A raw JSON document: either a bare array of plugin objects or an
    /// object with a `plugins` key
    RawJson,
    /// Listing via a repository-hosting API (reserved, not yet fetched)
    RepoApi,
}

/// A remote source of plugin metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSource {
    /// Human-readable source name, used in logs and provenance fields
    pub name: String,

    /// Feed URL
    pub url: String,

    /// Wire format of the feed
    pub format: SourceFormat,

    /// Whether this source is an official first-party feed. Plugins from
    /// official sources are marked verified.
    #[serde(default)]
    pub official: bool,

    /// Merge priority. Higher values win field conflicts during the merge.
    #[serde(default)]
    pub priority: i32,
}

impl PluginSource {
    /// The built-in source registry: the official Anthropic marketplace
    /// feed plus the community extended marketplace.
    pub fn default_registry() -> Vec<PluginSource> {
        vec![
            PluginSource {
                name: "Anthropic Official".to_string(),
                url: "https://raw.githubusercontent.com/anthropics/claude-code/main/.claude-plugin/marketplace.json"
                    .to_string(),
                format: SourceFormat::RawJson,
                official: true,
                priority: 100,
            },
            PluginSource {
                name: "Claude Code Plugins Plus Skills".to_string(),
                url: "https://raw.githubusercontent.com/jeremylongshore/claude-code-plugins-plus-skills/main/marketplace.extended.json"
                    .to_string(),
                format: SourceFormat::RawJson,
                official: false,
                priority: 80,
            },
        ]
    }
}

/// Fixed plugin category set.
///
/// Variant order matters: categorization ties are broken by enumeration
/// order, and `Other` is the default when no keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// CI/CD, containers, and infrastructure tooling
    Devops,
    /// Test frameworks and coverage tooling
    Testing,
    /// UI frameworks and styling
    Frontend,
    /// APIs and server frameworks
    Backend,
    /// Auditing, vulnerabilities, and auth
    Security,
    /// LLM, agent, and MCP tooling
    Ai,
    /// Databases and migrations
    Database,
    /// Docs, readmes, and markdown tooling
    Documentation,
    /// Version control workflows
    Git,
    /// Hosting and release tooling
    Deployment,
    /// Observability and alerting
    Monitoring,
    /// General-purpose helpers
    Utilities,
    /// iOS/Android development
    Mobile,
    /// Serverless and cloud platforms
    Cloud,
    /// Fallback category
    Other,
}

impl Category {
    /// All categories in enumeration (tie-break) order.
    pub const ALL: [Category; 15] = [
        Category::Devops,
        Category::Testing,
        Category::Frontend,
        Category::Backend,
        Category::Security,
        Category::Ai,
        Category::Database,
        Category::Documentation,
        Category::Git,
        Category::Deployment,
        Category::Monitoring,
        Category::Utilities,
        Category::Mobile,
        Category::Cloud,
        Category::Other,
    ];

    /// Lowercase string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Devops => "devops",
            Category::Testing => "testing",
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Security => "security",
            Category::Ai => "ai",
            Category::Database => "database",
            Category::Documentation => "documentation",
            Category::Git => "git",
            Category::Deployment => "deployment",
            Category::Monitoring => "monitoring",
            Category::Utilities => "utilities",
            Category::Mobile => "mobile",
            Category::Cloud => "cloud",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or(())
    }
}

/// Keyword-substring to category mapping used for auto-categorization.
const KEYWORD_CATEGORIES: &[(&str, Category)] = &[
    // DevOps
    ("docker", Category::Devops),
    ("kubernetes", Category::Devops),
    ("k8s", Category::Devops),
    ("ci", Category::Devops),
    ("cd", Category::Devops),
    ("pipeline", Category::Devops),
    ("terraform", Category::Devops),
    ("ansible", Category::Devops),
    ("helm", Category::Devops),
    // Testing
    ("test", Category::Testing),
    ("testing", Category::Testing),
    ("jest", Category::Testing),
    ("pytest", Category::Testing),
    ("e2e", Category::Testing),
    ("unit", Category::Testing),
    ("coverage", Category::Testing),
    // Frontend
    ("react", Category::Frontend),
    ("vue", Category::Frontend),
    ("angular", Category::Frontend),
    ("nextjs", Category::Frontend),
    ("next", Category::Frontend),
    ("tailwind", Category::Frontend),
    ("css", Category::Frontend),
    ("ui", Category::Frontend),
    ("component", Category::Frontend),
    // Backend
    ("api", Category::Backend),
    ("rest", Category::Backend),
    ("graphql", Category::Backend),
    ("fastapi", Category::Backend),
    ("django", Category::Backend),
    ("flask", Category::Backend),
    ("express", Category::Backend),
    // Security
    ("security", Category::Security),
    ("audit", Category::Security),
    ("vulnerability", Category::Security),
    ("auth", Category::Security),
    ("oauth", Category::Security),
    // AI/ML
    ("ai", Category::Ai),
    ("ml", Category::Ai),
    ("machine-learning", Category::Ai),
    ("llm", Category::Ai),
    ("agent", Category::Ai),
    ("mcp", Category::Ai),
    // Database
    ("database", Category::Database),
    ("sql", Category::Database),
    ("postgres", Category::Database),
    ("mysql", Category::Database),
    ("mongodb", Category::Database),
    ("redis", Category::Database),
    ("migration", Category::Database),
    // Git
    ("git", Category::Git),
    ("github", Category::Git),
    ("gitlab", Category::Git),
    ("commit", Category::Git),
    ("pr", Category::Git),
    ("pull-request", Category::Git),
    // Documentation
    ("doc", Category::Documentation),
    ("documentation", Category::Documentation),
    ("readme", Category::Documentation),
    ("markdown", Category::Documentation),
    // Deployment
    ("deploy", Category::Deployment),
    ("deployment", Category::Deployment),
    ("vercel", Category::Deployment),
    ("netlify", Category::Deployment),
    ("aws", Category::Deployment),
    ("gcp", Category::Deployment),
    ("azure", Category::Deployment),
    // Mobile
    ("mobile", Category::Mobile),
    ("ios", Category::Mobile),
    ("android", Category::Mobile),
    ("react-native", Category::Mobile),
    ("flutter", Category::Mobile),
    // Cloud
    ("cloud", Category::Cloud),
    ("serverless", Category::Cloud),
    ("lambda", Category::Cloud),
    ("functions", Category::Cloud),
];

/// Auto-categorize a plugin from its name, description, and keywords.
///
/// Builds a single lowercase text blob and counts, per category, how many
/// of its associated keywords occur anywhere in the blob (substring
/// containment, not word-boundary matching). The category with the highest
/// count wins; ties go to the earlier variant in enumeration order.
/// Returns [`Category::Other`] when nothing matches.
pub fn categorize(name: &str, description: &str, keywords: &[String]) -> Category {
    let text = format!("{} {} {}", name, description, keywords.join(" ")).to_lowercase();

    let mut best = Category::Other;
    let mut best_score = 0usize;

    for candidate in Category::ALL {
        let score = KEYWORD_CATEGORIES
            .iter()
            .filter(|(keyword, category)| *category == candidate && text.contains(keyword))
            .count();

        if score > best_score {
            best = candidate;
            best_score = score;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_devops() {
        let category = categorize("docker-deploy", "Deploy containers", &[]);
        assert_eq!(category, Category::Devops);
    }

    #[test]
    fn test_categorize_default() {
        let category = categorize("unknown-plugin", "Does something", &[]);
        assert_eq!(category, Category::Other);
    }

    #[test]
    fn test_categorize_uses_keywords() {
        let keywords = vec!["pytest".to_string(), "coverage".to_string()];
        let category = categorize("helper", "misc", &keywords);
        assert_eq!(category, Category::Testing);
    }

    #[test]
    fn test_categorize_tie_breaks_by_enum_order() {
        // "test" scores 1 for Testing; "deploy" scores 1 for Deployment.
        // Testing comes first in enumeration order.
        let category = categorize("plug", "test then deploy", &[]);
        assert_eq!(category, Category::Testing);
    }

    #[test]
    fn test_categorize_substring_containment() {
        // "cicd" contains both "ci" and "cd" as substrings
        let category = categorize("cicd-helper", "", &[]);
        assert_eq!(category, Category::Devops);
    }

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("not-a-category".parse::<Category>().is_err());
    }

    #[test]
    fn test_default_registry_ordering() {
        let sources = PluginSource::default_registry();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].official);
        assert!(sources[0].priority > sources[1].priority);
    }
}
