//! Quality analyzer integration tests over realistic plugin trees.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use plugdex::core::config::PlugdexConfig;
use plugdex::io::reports::{render_json, render_markdown};
use plugdex::quality::report::{QualityAnalyzer, RecommendationPriority};

fn write_well_kept_plugin(root: &Path) {
    fs::write(
        root.join("plugin.json"),
        r#"{
            "name": "well-kept",
            "version": "2.0.0",
            "description": "A plugin with its house in order",
            "author": {"name": "Maintainer", "url": "https://example.dev"}
        }"#,
    )
    .unwrap();
    fs::write(root.join("README.md"), "# well-kept\n\nUsage docs.").unwrap();
    fs::write(root.join("CHANGELOG.md"), "# 2.0.0").unwrap();
    fs::write(root.join("LICENSE"), "MIT").unwrap();
    fs::write(root.join("CONTRIBUTING.md"), "# Contributing").unwrap();

    fs::create_dir(root.join("commands")).unwrap();
    fs::write(root.join("commands/run.md"), "# run").unwrap();
    fs::create_dir(root.join("agents")).unwrap();
    fs::write(root.join("agents/helper.md"), "# helper").unwrap();

    fs::create_dir(root.join("tests")).unwrap();
    fs::write(root.join("tests/test_run.py"), "def test_ok():\n    pass\n").unwrap();
    fs::create_dir_all(root.join(".github/workflows")).unwrap();
    fs::write(root.join(".github/workflows/ci.yml"), "on: push\n").unwrap();
}

fn write_risky_plugin(root: &Path) {
    fs::write(root.join("plugin.json"), r#"{"name": "risky"}"#).unwrap();
    fs::write(
        root.join("hook.py"),
        "import os\nresult = eval(user_input)\nos.system('rm -rf /tmp/cache')\n",
    )
    .unwrap();
    fs::write(root.join("config.yml"), "api_key = 'sk-live-123'\n").unwrap();
}

fn analyzer() -> QualityAnalyzer {
    QualityAnalyzer::new(&PlugdexConfig::default()).unwrap()
}

#[test]
fn well_kept_plugin_scores_high() {
    let temp = TempDir::new().unwrap();
    write_well_kept_plugin(temp.path());

    let report = analyzer().analyze_local(temp.path()).unwrap();

    assert_eq!(report.plugin_name, "well-kept");
    assert_eq!(report.security.score, 100);
    assert_eq!(report.documentation.score, 100);
    assert_eq!(report.testing.score, 100);
    // maintenance stays at the unknown baseline (50) for local targets:
    // 100*0.30 + 50*0.25 + 100*0.25 + 100*0.20 = 87.5, truncated
    assert_eq!(report.overall_score, 87);

    assert_eq!(report.components.commands, 1);
    assert_eq!(report.components.agents, 1);
    assert!(
        report.recommendations.is_empty(),
        "nothing to recommend: {:?}",
        report.recommendations
    );
}

#[test]
fn risky_plugin_is_flagged() {
    let temp = TempDir::new().unwrap();
    write_risky_plugin(temp.path());

    let report = analyzer().analyze_local(temp.path()).unwrap();

    // eval (-20), os.system warning (-5), hardcoded secret (-30)
    assert_eq!(report.security.score, 45);
    assert!(report.security.issues.iter().any(|i| i.contains("eval")));
    assert!(report
        .security
        .issues
        .iter()
        .any(|i| i.contains("hardcoded secret")));

    assert!(report
        .recommendations
        .iter()
        .any(|r| r.priority == RecommendationPriority::High && r.category == "Security"));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.priority == RecommendationPriority::High && r.issue == "Missing README.md"));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.priority == RecommendationPriority::Medium && r.category == "Testing"));
}

#[test]
fn markdown_and_json_renderings_agree() {
    let temp = TempDir::new().unwrap();
    write_well_kept_plugin(temp.path());

    let report = analyzer().analyze_local(temp.path()).unwrap();

    let markdown = render_markdown(&report);
    assert!(markdown.contains("# Quality Report: well-kept"));
    assert!(markdown.contains(&format!(
        "**Overall Score:** {}/100",
        report.overall_score
    )));
    assert!(markdown.contains("## Security (100/100)"));

    let json = render_json(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["plugin_name"], "well-kept");
    assert_eq!(parsed["overall_score"], report.overall_score as i64);
}

#[test]
fn analyzer_rejects_nonexistent_target() {
    let result = analyzer().analyze_local(Path::new("/definitely/not/here"));
    assert!(result.is_err());
}
