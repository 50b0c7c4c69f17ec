//! Quality report composition: runs every check over a plugin tree and
//! rolls the sub-scores into a weighted overall score with actionable
//! recommendations.
//!
//! Targets may be local directories or GitHub repository URLs. Remote
//! targets are shallow-cloned into a temporary directory; a `/tree/`
//! segment in the URL selects the branch and subdirectory to analyze.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::PlugdexConfig;
use crate::core::errors::{PlugdexError, Result};
use crate::quality::components::{detect_components, parse_manifest, PluginComponents};
use crate::quality::documentation::{check_documentation, DocumentationCheck};
use crate::quality::maintenance::{check_maintenance, MaintenanceCheck};
use crate::quality::security::{check_security, SecurityCheck};
use crate::quality::testing::{check_testing, TestingCheck};
use crate::scrape::enrich::{parse_github_repo, GithubEnricher};
use crate::scrape::normalize::MaintenanceStatus;

/// Weight of each sub-score in the overall score.
const SECURITY_WEIGHT: f64 = 0.30;
const MAINTENANCE_WEIGHT: f64 = 0.25;
const DOCUMENTATION_WEIGHT: f64 = 0.25;
const TESTING_WEIGHT: f64 = 0.20;

/// Urgency tier of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    /// Fix before publishing
    High,
    /// Fix soon
    Medium,
    /// Nice to have
    Low,
}

impl RecommendationPriority {
    /// Stable lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A single actionable recommendation derived from check findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Urgency tier
    pub priority: RecommendationPriority,
    /// Which check produced it
    pub category: String,
    /// The finding
    pub issue: String,
    /// Suggested fix
    pub action: String,
}

/// Full quality assessment of one plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Plugin name, from its manifest or directory name
    pub plugin_name: String,
    /// Repository URL when the target was remote
    pub plugin_url: String,
    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,
    /// Weighted overall score in [0, 100]
    pub overall_score: i32,
    /// Detected components
    pub components: PluginComponents,
    /// Security findings
    pub security: SecurityCheck,
    /// Maintenance findings
    pub maintenance: MaintenanceCheck,
    /// Documentation findings
    pub documentation: DocumentationCheck,
    /// Testing findings
    pub testing: TestingCheck,
    /// Prioritized follow-ups
    pub recommendations: Vec<Recommendation>,
}

/// Weighted overall score, truncated toward zero.
pub fn overall_score(
    security: &SecurityCheck,
    maintenance: &MaintenanceCheck,
    documentation: &DocumentationCheck,
    testing: &TestingCheck,
) -> i32 {
    (f64::from(security.score) * SECURITY_WEIGHT
        + f64::from(maintenance.score) * MAINTENANCE_WEIGHT
        + f64::from(documentation.score) * DOCUMENTATION_WEIGHT
        + f64::from(testing.score) * TESTING_WEIGHT) as i32
}

/// Derive prioritized recommendations from check findings.
pub fn generate_recommendations(
    security: &SecurityCheck,
    maintenance: &MaintenanceCheck,
    documentation: &DocumentationCheck,
    testing: &TestingCheck,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for issue in &security.issues {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            category: "Security".to_string(),
            issue: issue.clone(),
            action: "Review and remediate the flagged code".to_string(),
        });
    }

    if !documentation.has_readme {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            category: "Documentation".to_string(),
            issue: "Missing README.md".to_string(),
            action: "Add a README covering installation and usage".to_string(),
        });
    }

    if !testing.has_tests {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            category: "Testing".to_string(),
            issue: "No automated tests found".to_string(),
            action: "Add a test suite exercising the plugin's commands".to_string(),
        });
    }

    if !testing.has_ci {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            category: "Testing".to_string(),
            issue: "No CI/CD configuration found".to_string(),
            action: "Add a CI workflow that runs the tests on every push".to_string(),
        });
    }

    for issue in documentation
        .issues
        .iter()
        .filter(|issue| *issue != "Missing README.md")
    {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            category: "Documentation".to_string(),
            issue: issue.clone(),
            action: "Fill the documentation gap".to_string(),
        });
    }

    if maintenance.status == MaintenanceStatus::Stale {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Low,
            category: "Maintenance".to_string(),
            issue: "No commits in over a year".to_string(),
            action: "Check whether an actively maintained fork exists".to_string(),
        });
    }

    for warning in &security.warnings {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Low,
            category: "Security".to_string(),
            issue: warning.clone(),
            action: "Review the flagged usage".to_string(),
        });
    }

    recommendations
}

/// Parsed form of an analysis target URL.
struct RemoteTarget {
    clone_url: String,
    branch: Option<String>,
    subpath: Option<PathBuf>,
}

/// Split a GitHub web URL into a clone URL plus the branch and
/// subdirectory selected by a `/tree/<branch>/<path>` suffix.
fn parse_remote_target(url: &str) -> Option<RemoteTarget> {
    let (owner, repo) = parse_github_repo(url)?;
    let clone_url = format!("https://github.com/{owner}/{repo}.git");

    let (branch, subpath) = match url.split_once("/tree/") {
        Some((_, rest)) => {
            let mut segments = rest.splitn(2, '/');
            let branch = segments.next().filter(|b| !b.is_empty()).map(String::from);
            let subpath = segments
                .next()
                .filter(|p| !p.is_empty())
                .map(|p| PathBuf::from(p.trim_end_matches('/')));
            (branch, subpath)
        }
        None => (None, None),
    };

    Some(RemoteTarget {
        clone_url,
        branch,
        subpath,
    })
}

/// Runs quality checks against local plugin trees and remote repositories.
pub struct QualityAnalyzer {
    enricher: GithubEnricher,
}

impl QualityAnalyzer {
    /// Create a new analyzer from the pipeline configuration.
    pub fn new(config: &PlugdexConfig) -> Result<Self> {
        Ok(Self {
            enricher: GithubEnricher::new(config)?,
        })
    }

    /// Analyze a target, which is either a local directory path or a
    /// GitHub repository URL.
    pub async fn analyze(&self, target: &str) -> Result<QualityReport> {
        if target.starts_with("http://") || target.starts_with("https://") {
            self.analyze_remote(target).await
        } else {
            self.analyze_local(Path::new(target))
        }
    }

    /// Analyze a plugin tree already on disk. Maintenance stays at its
    /// unknown baseline since no repository metadata is available.
    pub fn analyze_local(&self, path: &Path) -> Result<QualityReport> {
        if !path.is_dir() {
            return Err(PlugdexError::validation(format!(
                "analysis target is not a directory: {}",
                path.display()
            )));
        }

        Ok(self.analyze_tree(path, String::new(), MaintenanceCheck::default()))
    }

    async fn analyze_remote(&self, url: &str) -> Result<QualityReport> {
        let target = parse_remote_target(url).ok_or_else(|| {
            PlugdexError::validation(format!("not a GitHub repository URL: {url}"))
        })?;

        let temp = tempfile::tempdir()
            .map_err(|e| PlugdexError::io("Failed to create clone directory", e))?;

        info!(url = %target.clone_url, "Cloning repository for analysis");
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.depth(1);
        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch_options);
        if let Some(branch) = &target.branch {
            builder.branch(branch);
        }
        builder
            .clone(&target.clone_url, temp.path())
            .map_err(|e| PlugdexError::git(e.message().to_string(), target.clone_url.clone()))?;

        let root = match &target.subpath {
            Some(subpath) => {
                let root = temp.path().join(subpath);
                if !root.is_dir() {
                    return Err(PlugdexError::validation(format!(
                        "path '{}' not found in repository",
                        subpath.display()
                    )));
                }
                root
            }
            None => temp.path().to_path_buf(),
        };

        let maintenance = match self.enricher.repo_activity(url).await {
            Some((status, pushed_at)) => check_maintenance(status, &pushed_at),
            None => MaintenanceCheck::default(),
        };

        Ok(self.analyze_tree(&root, url.to_string(), maintenance))
    }

    fn analyze_tree(
        &self,
        path: &Path,
        plugin_url: String,
        maintenance: MaintenanceCheck,
    ) -> QualityReport {
        let manifest = parse_manifest(path);
        let plugin_name = manifest.name.unwrap_or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string()
        });

        debug!(plugin = %plugin_name, path = %path.display(), "Running quality checks");

        let components = detect_components(path);
        let security = check_security(path);
        let documentation = check_documentation(path, &components);
        let testing = check_testing(path);

        let recommendations =
            generate_recommendations(&security, &maintenance, &documentation, &testing);

        QualityReport {
            overall_score: overall_score(&security, &maintenance, &documentation, &testing),
            plugin_name,
            plugin_url,
            generated_at: Utc::now(),
            components,
            security,
            maintenance,
            documentation,
            testing,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn full_security() -> SecurityCheck {
        SecurityCheck::default()
    }

    #[test]
    fn test_overall_score_weights() {
        let security = SecurityCheck {
            score: 80,
            ..SecurityCheck::default()
        };
        let maintenance = MaintenanceCheck {
            score: 100,
            ..MaintenanceCheck::default()
        };
        let documentation = DocumentationCheck {
            score: 40,
            ..DocumentationCheck::default()
        };
        let testing = TestingCheck {
            score: 50,
            ..TestingCheck::default()
        };

        // 80*0.30 + 100*0.25 + 40*0.25 + 50*0.20 = 24 + 25 + 10 + 10 = 69
        assert_eq!(
            overall_score(&security, &maintenance, &documentation, &testing),
            69
        );
    }

    #[test]
    fn test_overall_score_truncates() {
        let security = SecurityCheck {
            score: 95,
            ..SecurityCheck::default()
        };
        let maintenance = MaintenanceCheck {
            score: 85,
            ..MaintenanceCheck::default()
        };
        let documentation = DocumentationCheck {
            score: 55,
            ..DocumentationCheck::default()
        };
        let testing = TestingCheck {
            score: 50,
            ..TestingCheck::default()
        };

        // 28.5 + 21.25 + 13.75 + 10 = 73.5, truncated to 73
        assert_eq!(
            overall_score(&security, &maintenance, &documentation, &testing),
            73
        );
    }

    #[test]
    fn test_security_issues_become_high_priority() {
        let security = SecurityCheck {
            score: 80,
            issues: vec!["bad.py: Uses eval() - potential code injection".to_string()],
            ..SecurityCheck::default()
        };
        let documentation = DocumentationCheck {
            has_readme: true,
            ..DocumentationCheck::default()
        };
        let testing = TestingCheck {
            has_tests: true,
            has_ci: true,
            ..TestingCheck::default()
        };

        let recommendations = generate_recommendations(
            &security,
            &MaintenanceCheck::default(),
            &documentation,
            &testing,
        );

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].priority, RecommendationPriority::High);
        assert_eq!(recommendations[0].category, "Security");
    }

    #[test]
    fn test_missing_readme_is_high_priority() {
        let documentation = DocumentationCheck {
            issues: vec!["Missing README.md".to_string()],
            ..DocumentationCheck::default()
        };
        let testing = TestingCheck {
            has_tests: true,
            has_ci: true,
            ..TestingCheck::default()
        };

        let recommendations = generate_recommendations(
            &full_security(),
            &MaintenanceCheck::default(),
            &documentation,
            &testing,
        );

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].priority, RecommendationPriority::High);
        assert_eq!(recommendations[0].issue, "Missing README.md");
    }

    #[test]
    fn test_stale_plugin_gets_low_priority_note() {
        let maintenance = MaintenanceCheck {
            score: 30,
            status: MaintenanceStatus::Stale,
            ..MaintenanceCheck::default()
        };
        let documentation = DocumentationCheck {
            has_readme: true,
            ..DocumentationCheck::default()
        };
        let testing = TestingCheck {
            has_tests: true,
            has_ci: true,
            ..TestingCheck::default()
        };

        let recommendations =
            generate_recommendations(&full_security(), &maintenance, &documentation, &testing);

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].priority, RecommendationPriority::Low);
        assert_eq!(recommendations[0].category, "Maintenance");
    }

    #[test]
    fn test_analyze_local_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(
            root.join("plugin.json"),
            r#"{"name": "demo-plugin", "version": "1.0.0"}"#,
        )
        .unwrap();
        fs::write(root.join("README.md"), "# demo").unwrap();
        fs::create_dir(root.join("commands")).unwrap();
        fs::write(root.join("commands/run.md"), "# run").unwrap();

        let analyzer = QualityAnalyzer::new(&PlugdexConfig::default()).unwrap();
        let report = analyzer.analyze_local(root).unwrap();

        assert_eq!(report.plugin_name, "demo-plugin");
        assert_eq!(report.components.commands, 1);
        assert_eq!(report.security.score, 100);
        // 100*0.30 + 50*0.25 + 50*0.25 + 0*0.20 = 55
        assert_eq!(report.overall_score, 55);
    }

    #[test]
    fn test_analyze_local_rejects_missing_dir() {
        let analyzer = QualityAnalyzer::new(&PlugdexConfig::default()).unwrap();
        assert!(analyzer.analyze_local(Path::new("/no/such/dir")).is_err());
    }

    #[test]
    fn test_parse_remote_target_with_tree() {
        let target =
            parse_remote_target("https://github.com/a/b/tree/main/plugins/demo").unwrap();
        assert_eq!(target.clone_url, "https://github.com/a/b.git");
        assert_eq!(target.branch.as_deref(), Some("main"));
        assert_eq!(target.subpath.as_deref(), Some(Path::new("plugins/demo")));
    }

    #[test]
    fn test_parse_remote_target_bare_repo() {
        let target = parse_remote_target("https://github.com/a/b").unwrap();
        assert_eq!(target.clone_url, "https://github.com/a/b.git");
        assert!(target.branch.is_none());
        assert!(target.subpath.is_none());
    }
}
