//! Quality report rendering: markdown for humans, pretty JSON for tools.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::errors::{PlugdexError, Result};
use crate::quality::report::{QualityReport, Recommendation, RecommendationPriority};

fn check_mark(present: bool) -> &'static str {
    if present {
        "yes"
    } else {
        "no"
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n**{heading}:**\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

fn push_recommendations(
    out: &mut String,
    heading: &str,
    priority: RecommendationPriority,
    recommendations: &[Recommendation],
) {
    let matching: Vec<&Recommendation> = recommendations
        .iter()
        .filter(|r| r.priority == priority)
        .collect();
    if matching.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n### {heading}\n");
    for rec in matching {
        let _ = writeln!(out, "- **[{}]** {}", rec.category, rec.issue);
        let _ = writeln!(out, "  - Action: {}", rec.action);
    }
}

/// Render a quality report as markdown.
pub fn render_markdown(report: &QualityReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Quality Report: {}\n", report.plugin_name);
    if !report.plugin_url.is_empty() {
        let _ = writeln!(out, "**Repository:** {}", report.plugin_url);
    }
    let _ = writeln!(
        out,
        "**Generated:** {}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "**Overall Score:** {}/100", report.overall_score);

    let _ = writeln!(out, "\n## Components\n");
    let _ = writeln!(out, "- Commands: {}", report.components.commands);
    let _ = writeln!(out, "- Agents: {}", report.components.agents);
    let _ = writeln!(out, "- Hooks: {}", report.components.hooks);
    let _ = writeln!(out, "- MCP servers: {}", report.components.mcp_servers);

    let _ = writeln!(out, "\n## Security ({}/100)", report.security.score);
    push_list(&mut out, "Issues", &report.security.issues);
    push_list(&mut out, "Warnings", &report.security.warnings);
    push_list(&mut out, "Passes", &report.security.passes);

    let _ = writeln!(out, "\n## Maintenance ({}/100)\n", report.maintenance.score);
    let _ = writeln!(out, "- Status: {}", report.maintenance.status.as_str());
    if !report.maintenance.last_commit.is_empty() {
        let _ = writeln!(out, "- Last commit: {}", report.maintenance.last_commit);
    }
    if !report.maintenance.commit_frequency.is_empty() {
        let _ = writeln!(
            out,
            "- Commit frequency: {}",
            report.maintenance.commit_frequency
        );
    }

    let _ = writeln!(
        out,
        "\n## Documentation ({}/100)\n",
        report.documentation.score
    );
    let _ = writeln!(out, "- README: {}", check_mark(report.documentation.has_readme));
    let _ = writeln!(
        out,
        "- CHANGELOG: {}",
        check_mark(report.documentation.has_changelog)
    );
    let _ = writeln!(out, "- LICENSE: {}", check_mark(report.documentation.has_license));
    let _ = writeln!(
        out,
        "- CONTRIBUTING: {}",
        check_mark(report.documentation.has_contributing)
    );
    push_list(&mut out, "Gaps", &report.documentation.issues);

    let _ = writeln!(out, "\n## Testing ({}/100)\n", report.testing.score);
    let _ = writeln!(out, "- Tests: {}", check_mark(report.testing.has_tests));
    if !report.testing.test_framework.is_empty() {
        let _ = writeln!(out, "- Framework: {}", report.testing.test_framework);
    }
    let _ = writeln!(out, "- CI/CD: {}", check_mark(report.testing.has_ci));

    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "\n## Recommendations");
        push_recommendations(
            &mut out,
            "High Priority",
            RecommendationPriority::High,
            &report.recommendations,
        );
        push_recommendations(
            &mut out,
            "Medium Priority",
            RecommendationPriority::Medium,
            &report.recommendations,
        );
        push_recommendations(
            &mut out,
            "Low Priority",
            RecommendationPriority::Low,
            &report.recommendations,
        );
    }

    out
}

/// Render a quality report as pretty JSON.
pub fn render_json(report: &QualityReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .map_err(|e| PlugdexError::io(format!("Failed to write report: {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::components::PluginComponents;
    use crate::quality::documentation::DocumentationCheck;
    use crate::quality::maintenance::MaintenanceCheck;
    use crate::quality::security::SecurityCheck;
    use crate::quality::testing::TestingCheck;
    use chrono::Utc;

    fn sample_report() -> QualityReport {
        QualityReport {
            plugin_name: "demo-plugin".to_string(),
            plugin_url: "https://github.com/a/b".to_string(),
            generated_at: Utc::now(),
            overall_score: 72,
            components: PluginComponents {
                commands: 2,
                ..PluginComponents::default()
            },
            security: SecurityCheck {
                score: 80,
                issues: vec!["bad.py: Uses eval() - potential code injection".to_string()],
                ..SecurityCheck::default()
            },
            maintenance: MaintenanceCheck::default(),
            documentation: DocumentationCheck {
                score: 40,
                has_readme: true,
                ..DocumentationCheck::default()
            },
            testing: TestingCheck::default(),
            recommendations: vec![Recommendation {
                priority: RecommendationPriority::High,
                category: "Security".to_string(),
                issue: "bad.py: Uses eval() - potential code injection".to_string(),
                action: "Review and remediate the flagged code".to_string(),
            }],
        }
    }

    #[test]
    fn test_markdown_contains_sections() {
        let markdown = render_markdown(&sample_report());

        assert!(markdown.contains("# Quality Report: demo-plugin"));
        assert!(markdown.contains("**Overall Score:** 72/100"));
        assert!(markdown.contains("## Security (80/100)"));
        assert!(markdown.contains("## Documentation (40/100)"));
        assert!(markdown.contains("### High Priority"));
        assert!(markdown.contains("Uses eval()"));
    }

    #[test]
    fn test_markdown_omits_empty_recommendations() {
        let mut report = sample_report();
        report.recommendations.clear();

        let markdown = render_markdown(&report);
        assert!(!markdown.contains("## Recommendations"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = render_json(&sample_report()).unwrap();
        let parsed: QualityReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.plugin_name, "demo-plugin");
        assert_eq!(parsed.overall_score, 72);
    }
}
