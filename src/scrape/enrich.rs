//! GitHub enrichment: popularity metrics and maintenance status.
//!
//! Enrichment is fail-open by design. A network hiccup, a 404, or a
//! malformed timestamp leaves the plugin exactly as it was; nothing in
//! this module aborts a scrape.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::config::PlugdexConfig;
use crate::core::errors::Result;
use crate::scrape::normalize::{CanonicalPlugin, MaintenanceStatus};

static GITHUB_REPO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com[/:]([^/]+)/([^/]+)").expect("valid regex"));

/// Repository metadata returned by the GitHub repos API.
#[derive(Debug, Deserialize)]
struct GithubRepoInfo {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    pushed_at: Option<String>,
}

/// Derive a maintenance status from days elapsed since the last push.
pub fn status_from_days(days_since_push: i64) -> MaintenanceStatus {
    if days_since_push < 14 {
        MaintenanceStatus::Active
    } else if days_since_push < 90 {
        MaintenanceStatus::Maintained
    } else if days_since_push < 365 {
        MaintenanceStatus::Slow
    } else {
        MaintenanceStatus::Stale
    }
}

/// Extract `(owner, repo)` from a GitHub repository URL.
///
/// Trailing `.git` suffixes and `/tree/...` path segments are stripped
/// from the repo component. Returns `None` for non-GitHub URLs.
pub fn parse_github_repo(url: &str) -> Option<(String, String)> {
    let captures = GITHUB_REPO_RE.captures(url)?;
    let owner = captures.get(1)?.as_str().to_string();
    let repo = captures
        .get(2)?
        .as_str()
        .trim_end_matches(".git")
        .split('/')
        .next()?
        .to_string();

    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

/// Enriches plugins with GitHub repository metadata.
pub struct GithubEnricher {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubEnricher {
    /// Create a new enricher from the pipeline configuration.
    pub fn new(config: &PlugdexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.scraper.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.scraper.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.github.api_base.trim_end_matches('/').to_string(),
            token: config.github.token.clone(),
        })
    }

    /// Enrich a plugin with star/fork/issue counts and a maintenance
    /// status derived from push recency.
    ///
    /// No-op when the plugin has no recognizable GitHub repository URL.
    /// All failures are logged and swallowed; the plugin keeps whatever
    /// fields it already had.
    pub async fn enrich(&self, plugin: &mut CanonicalPlugin) {
        let Some((owner, repo)) = parse_github_repo(&plugin.repository_url) else {
            return;
        };

        match self.fetch_repo(&owner, &repo).await {
            Ok(info) => {
                plugin.github_stars = Some(info.stargazers_count);
                plugin.github_forks = Some(info.forks_count);
                plugin.open_issues = Some(info.open_issues_count);

                if let Some(pushed_at) = info.pushed_at.as_deref() {
                    match DateTime::parse_from_rfc3339(pushed_at) {
                        Ok(pushed) => {
                            let days = (Utc::now() - pushed.with_timezone(&Utc)).num_days();
                            plugin.maintenance_status = status_from_days(days);
                        }
                        Err(e) => {
                            warn!(
                                plugin = %plugin.name,
                                error = %e,
                                "Malformed pushed_at timestamp, status left unset"
                            );
                        }
                    }
                }

                debug!(
                    plugin = %plugin.name,
                    stars = ?plugin.github_stars,
                    "Enriched plugin with GitHub data"
                );
            }
            Err(e) => {
                warn!(plugin = %plugin.name, error = %e, "Failed to enrich with GitHub");
            }
        }
    }

    /// Fetch the maintenance status and last push timestamp for a
    /// repository URL. Returns `None` for non-GitHub URLs or on any
    /// API failure.
    pub async fn repo_activity(&self, repo_url: &str) -> Option<(MaintenanceStatus, String)> {
        let (owner, repo) = parse_github_repo(repo_url)?;

        match self.fetch_repo(&owner, &repo).await {
            Ok(info) => {
                let pushed_at = info.pushed_at.unwrap_or_default();
                let status = DateTime::parse_from_rfc3339(&pushed_at)
                    .ok()
                    .map(|pushed| {
                        status_from_days((Utc::now() - pushed.with_timezone(&Utc)).num_days())
                    })
                    .unwrap_or(MaintenanceStatus::Unknown);
                Some((status, pushed_at))
            }
            Err(e) => {
                warn!(owner = %owner, repo = %repo, error = %e, "Failed to fetch repo activity");
                None
            }
        }
    }

    async fn fetch_repo(&self, owner: &str, repo: &str) -> Result<GithubRepoInfo> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let response = response.error_for_status()?;
        let info = response.json::<GithubRepoInfo>().await?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_from_days(5), MaintenanceStatus::Active);
        assert_eq!(status_from_days(13), MaintenanceStatus::Active);
        assert_eq!(status_from_days(14), MaintenanceStatus::Maintained);
        assert_eq!(status_from_days(40), MaintenanceStatus::Maintained);
        assert_eq!(status_from_days(200), MaintenanceStatus::Slow);
        assert_eq!(status_from_days(400), MaintenanceStatus::Stale);
    }

    #[test]
    fn test_status_from_real_timestamps() {
        for (days_ago, expected) in [
            (5, MaintenanceStatus::Active),
            (40, MaintenanceStatus::Maintained),
            (200, MaintenanceStatus::Slow),
            (400, MaintenanceStatus::Stale),
        ] {
            let pushed = Utc::now() - Duration::days(days_ago);
            let elapsed = (Utc::now() - pushed).num_days();
            assert_eq!(status_from_days(elapsed), expected);
        }
    }

    #[test]
    fn test_parse_github_repo() {
        assert_eq!(
            parse_github_repo("https://github.com/anthropics/claude-code"),
            Some(("anthropics".to_string(), "claude-code".to_string()))
        );
        assert_eq!(
            parse_github_repo("https://github.com/a/b.git"),
            Some(("a".to_string(), "b".to_string()))
        );
        assert_eq!(
            parse_github_repo("https://github.com/a/b/tree/main/plugins/x"),
            Some(("a".to_string(), "b".to_string()))
        );
    }

    #[test]
    fn test_parse_non_github_urls() {
        assert_eq!(parse_github_repo("https://gitlab.com/a/b"), None);
        assert_eq!(parse_github_repo(""), None);
        assert_eq!(parse_github_repo("not a url"), None);
    }
}
