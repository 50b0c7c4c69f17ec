//! Raw feed record normalization into the canonical plugin schema.
//!
//! Feed records are loosely shaped: keywords arrive as lists or
//! comma-separated strings, authors and repositories as plain strings or
//! objects. Every dynamic shape is decoded through an explicit untagged
//! union rather than probed at runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scrape::sources::{categorize, Category, PluginSource};

/// Maximum stored description length. Longer input is hard-truncated.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Feed-relative source path prefix recognized during repository URL
/// synthesis.
const RELATIVE_PLUGIN_PREFIX: &str = "./plugins/";

/// Coarse activity label derived from time since last repository push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    /// Pushed within the last 14 days
    Active,
    /// Pushed within the last 90 days
    Maintained,
    /// Pushed within the last 365 days
    Slow,
    /// No push for a year or more
    Stale,
    /// No repository data available
    #[default]
    Unknown,
}

impl MaintenanceStatus {
    /// Lowercase string form, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Active => "active",
            MaintenanceStatus::Maintained => "maintained",
            MaintenanceStatus::Slow => "slow",
            MaintenanceStatus::Stale => "stale",
            MaintenanceStatus::Unknown => "unknown",
        }
    }
}

/// Keywords field: either a JSON list or a comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeywordsField {
    /// `"keywords": ["a", "b"]`
    List(Vec<String>),
    /// `"keywords": "a, b"`
    Csv(String),
}

impl KeywordsField {
    /// Normalize to a list of trimmed, non-empty keyword strings.
    pub fn into_list(self) -> Vec<String> {
        match self {
            KeywordsField::List(items) => items
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            KeywordsField::Csv(csv) => csv
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }
}

/// Repository field: either a bare URL string or an object with a `url` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    /// `"repository": "https://github.com/..."`
    Url(String),
    /// `"repository": {"type": "git", "url": "..."}`
    Object {
        /// Repository URL
        #[serde(default)]
        url: String,
    },
}

impl RepositoryField {
    fn into_url(self) -> String {
        match self {
            RepositoryField::Url(url) => url,
            RepositoryField::Object { url } => url,
        }
    }
}

/// Author field: a plain name string or an object with name/url fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    /// `"author": "Jane Doe"`
    Name(String),
    /// `"author": {"name": "...", "url": "...", "homepage": "..."}`
    Object {
        /// Author display name
        #[serde(default)]
        name: String,
        /// Author profile URL
        #[serde(default)]
        url: String,
        /// Author homepage, used when `url` is absent
        #[serde(default)]
        homepage: String,
    },
}

impl AuthorField {
    /// Resolve to (name, url). Unrecognized shapes decode to empty fields
    /// via the serde defaults.
    pub fn into_parts(self) -> (String, String) {
        match self {
            AuthorField::Name(name) => (name, String::new()),
            AuthorField::Object {
                name,
                url,
                homepage,
            } => {
                let url = if url.is_empty() { homepage } else { url };
                (name, url)
            }
        }
    }
}

/// One untyped record from a remote feed. Shapes vary per source; every
/// field is optional and individually tolerant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeedRecord {
    /// Plugin display name. A record without one is dropped.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Version string
    #[serde(default)]
    pub version: Option<String>,
    /// Keywords (list or comma-separated)
    #[serde(default)]
    pub keywords: Option<KeywordsField>,
    /// Explicit category label
    #[serde(default)]
    pub category: Option<String>,
    /// Repository pointer (string or object)
    #[serde(default)]
    pub repository: Option<RepositoryField>,
    /// Feed-relative source path (e.g. `./plugins/foo`)
    #[serde(default)]
    pub source: Option<String>,
    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,
    /// Author (string or object)
    #[serde(default)]
    pub author: Option<AuthorField>,
}

/// A fully normalized plugin record in the canonical schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalPlugin {
    /// Display name
    pub name: String,
    /// URL-safe identifier derived from the name. Unique across the merged
    /// set; lowercase alphanumerics and single hyphens only.
    pub slug: String,
    /// Description, truncated to [`MAX_DESCRIPTION_LEN`]
    pub description: String,
    /// Version string, `0.0.0` when the feed omits it
    pub version: String,
    /// URL of the feed this record came from
    pub source_url: String,
    /// Source repository URL, possibly synthesized from a relative path
    pub repository_url: String,
    /// Homepage URL
    pub homepage_url: String,
    /// Author display name
    pub author_name: String,
    /// Author profile URL
    pub author_url: String,
    /// Assigned category
    pub category: Category,
    /// Comma-joined keyword list
    pub keywords: String,
    /// Mirrors the producing source's official flag
    pub is_verified: bool,
    /// Activity label, set by enrichment
    #[serde(default)]
    pub maintenance_status: MaintenanceStatus,
    /// GitHub star count, set by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_stars: Option<u64>,
    /// GitHub fork count, set by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_forks: Option<u64>,
    /// Open issue count, set by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_issues: Option<u64>,
    /// Name of the source that produced this record
    pub scraped_from: String,
    /// When the record was scraped
    pub scraped_at: DateTime<Utc>,
}

impl CanonicalPlugin {
    /// Backfill missing or falsy fields from a lower-priority record.
    ///
    /// A field already populated by a higher-priority source is never
    /// overwritten: only empty strings, `false`, absent metrics, and the
    /// `Unknown` status are filled in.
    pub fn backfill_from(&mut self, other: &CanonicalPlugin) {
        fn fill(dst: &mut String, src: &str) {
            if dst.is_empty() && !src.is_empty() {
                *dst = src.to_string();
            }
        }

        fill(&mut self.description, &other.description);
        fill(&mut self.version, &other.version);
        fill(&mut self.source_url, &other.source_url);
        fill(&mut self.repository_url, &other.repository_url);
        fill(&mut self.homepage_url, &other.homepage_url);
        fill(&mut self.author_name, &other.author_name);
        fill(&mut self.author_url, &other.author_url);
        fill(&mut self.keywords, &other.keywords);
        fill(&mut self.scraped_from, &other.scraped_from);

        // Category is never backfilled: normalization always assigns one
        // (explicit or categorizer default), so it counts as populated
        // even when it is `Other`.
        if !self.is_verified && other.is_verified {
            self.is_verified = true;
        }
        if self.maintenance_status == MaintenanceStatus::Unknown {
            self.maintenance_status = other.maintenance_status;
        }
        if self.github_stars.is_none() {
            self.github_stars = other.github_stars;
        }
        if self.github_forks.is_none() {
            self.github_forks = other.github_forks;
        }
        if self.open_issues.is_none() {
            self.open_issues = other.open_issues;
        }
    }

    /// Keywords as a list of strings.
    pub fn keyword_list(&self) -> Vec<String> {
        if self.keywords.is_empty() {
            return Vec::new();
        }
        self.keywords
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// Generate a URL-safe slug from a plugin name.
///
/// Lowercases the name, collapses whitespace and underscore runs to a
/// single hyphen, strips every other non-alphanumeric character, collapses
/// repeated hyphens, and trims leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() || ch == '_' || ch == '-' {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        }
        // Everything else is stripped
    }

    slug.trim_matches('-').to_string()
}

/// Normalize one raw feed record into the canonical schema.
///
/// Returns `None` when the record has no usable name. Pure transform:
/// repository synthesis substitutes against `repo_template` without
/// performing any I/O.
pub fn normalize(
    raw: RawFeedRecord,
    source: &PluginSource,
    repo_template: &str,
) -> Option<CanonicalPlugin> {
    let name = raw.name.unwrap_or_default();
    if name.trim().is_empty() {
        return None;
    }

    let slug = slugify(&name);
    if slug.is_empty() {
        return None;
    }

    let mut description = raw.description.unwrap_or_default();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        description = description.chars().take(MAX_DESCRIPTION_LEN).collect();
    }

    let keywords = raw.keywords.map(KeywordsField::into_list).unwrap_or_default();

    // Explicit recognized category wins; anything else goes through the
    // categorizer.
    let category = raw
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or_else(|| categorize(&name, &description, &keywords));

    // Repository URL: explicit field first, else synthesize from a known
    // relative source path against the configured upstream template.
    let mut repository_url = raw
        .repository
        .map(RepositoryField::into_url)
        .unwrap_or_default();

    if repository_url.is_empty() {
        if let Some(src_path) = raw.source.as_deref() {
            if let Some(plugin_dir) = src_path.strip_prefix(RELATIVE_PLUGIN_PREFIX) {
                repository_url = repo_template.replace("{path}", plugin_dir);
            }
        }
    }

    let (author_name, author_url) = raw
        .author
        .map(AuthorField::into_parts)
        .unwrap_or_default();

    Some(CanonicalPlugin {
        name,
        slug,
        description,
        // An absent version defaults; a present-but-empty one stays empty
        // so a lower-priority source can still fill it during the merge.
        version: raw.version.unwrap_or_else(|| "0.0.0".to_string()),
        source_url: source.url.clone(),
        repository_url,
        homepage_url: raw.homepage.unwrap_or_default(),
        author_name,
        author_url,
        category,
        keywords: keywords.join(","),
        is_verified: source.official,
        maintenance_status: MaintenanceStatus::Unknown,
        github_stars: None,
        github_forks: None,
        open_issues: None,
        scraped_from: source.name.clone(),
        scraped_at: Utc::now(),
    })
}
