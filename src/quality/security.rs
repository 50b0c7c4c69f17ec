//! Security check: dangerous-call and hardcoded-secret scanning.
//!
//! Each check deducts from a 100-point baseline. High-severity issues
//! (code evaluation) cost 20 points, warnings (process execution, file
//! deletion, outbound HTTP, dynamic imports) cost 5, and a
//! hardcoded-secret-looking assignment costs 30 with at most one penalty
//! per file.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::core::file_utils::FileReader;

/// Severity tier of a dangerous-call pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// Recorded as an issue, -20
    Issue,
    /// Recorded as a warning, -5
    Warning,
}

struct DangerousPattern {
    regex: regex::Regex,
    message: &'static str,
    severity: Severity,
}

fn pattern(source: &str, message: &'static str, severity: Severity) -> DangerousPattern {
    DangerousPattern {
        regex: RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .expect("valid regex"),
        message,
        severity,
    }
}

static DANGEROUS_PATTERNS: Lazy<Vec<DangerousPattern>> = Lazy::new(|| {
    vec![
        pattern(
            r"eval\s*\(",
            "Uses eval() - potential code injection",
            Severity::Issue,
        ),
        pattern(
            r"exec\s*\(",
            "Uses exec() - potential code injection",
            Severity::Issue,
        ),
        pattern(
            r"child_process|subprocess\.call|os\.system",
            "Executes external processes",
            Severity::Warning,
        ),
        pattern(
            r"fs\.unlink|os\.remove|shutil\.rmtree",
            "Deletes files/directories",
            Severity::Warning,
        ),
        pattern(
            r"requests\.get|httpx\.get|fetch\s*\(",
            "Makes external HTTP requests",
            Severity::Warning,
        ),
        pattern(
            r"__import__",
            "Dynamic imports - review carefully",
            Severity::Warning,
        ),
    ]
});

static SAFE_PATTERNS: Lazy<Vec<(regex::Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            RegexBuilder::new(r"validate|sanitize|escape")
                .case_insensitive(true)
                .build()
                .expect("valid regex"),
            "Uses input validation/sanitization",
        ),
        (
            RegexBuilder::new(r"try\s*:|except\s*:")
                .case_insensitive(true)
                .build()
                .expect("valid regex"),
            "Has error handling",
        ),
    ]
});

static SECRET_PATTERNS: Lazy<Vec<regex::Regex>> = Lazy::new(|| {
    [
        r#"api[_-]?key\s*=\s*['"][^'"]+['"]"#,
        r#"password\s*=\s*['"][^'"]+['"]"#,
        r#"secret\s*=\s*['"][^'"]+['"]"#,
        r#"token\s*=\s*['"][^'"]+['"]"#,
    ]
    .iter()
    .map(|source| {
        RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .expect("valid regex")
    })
    .collect()
});

/// Security assessment results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityCheck {
    /// Sub-score in [0, 100]
    pub score: i32,
    /// High-severity findings
    pub issues: Vec<String>,
    /// Lower-severity findings
    pub warnings: Vec<String>,
    /// Positive observations
    pub passes: Vec<String>,
}

impl Default for SecurityCheck {
    fn default() -> Self {
        Self {
            score: 100,
            issues: Vec::new(),
            warnings: Vec::new(),
            passes: Vec::new(),
        }
    }
}

fn files_with_ext<'a>(
    plugin_path: &Path,
    extensions: &'a [&'a str],
) -> impl Iterator<Item = std::path::PathBuf> + 'a {
    WalkDir::new(plugin_path)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(move |path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|ext| extensions.contains(&ext))
                .unwrap_or(false)
        })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string()
}

/// Scan a plugin tree for common security problems.
///
/// Unreadable or binary files are skipped; nothing here is fatal.
pub fn check_security(plugin_path: &Path) -> SecurityCheck {
    let mut security = SecurityCheck::default();

    // Dangerous and safe patterns over Python sources
    for file in files_with_ext(plugin_path, &["py"]) {
        let Ok(content) = FileReader::read_to_string(&file) else {
            continue;
        };

        for dangerous in DANGEROUS_PATTERNS.iter() {
            if dangerous.regex.is_match(&content) {
                let finding = format!("{}: {}", file_label(&file), dangerous.message);
                match dangerous.severity {
                    Severity::Issue => {
                        security.issues.push(finding);
                        security.score -= 20;
                    }
                    Severity::Warning => {
                        security.warnings.push(finding);
                        security.score -= 5;
                    }
                }
            }
        }

        for (regex, message) in SAFE_PATTERNS.iter() {
            if regex.is_match(&content) && !security.passes.iter().any(|p| p == message) {
                security.passes.push((*message).to_string());
            }
        }
    }

    // Dangerous patterns over JavaScript sources
    for file in files_with_ext(plugin_path, &["js"]) {
        let Ok(content) = FileReader::read_to_string(&file) else {
            continue;
        };

        for dangerous in DANGEROUS_PATTERNS.iter() {
            if dangerous.regex.is_match(&content) {
                let finding = format!("{}: {}", file_label(&file), dangerous.message);
                match dangerous.severity {
                    Severity::Issue => {
                        security.issues.push(finding);
                        security.score -= 20;
                    }
                    Severity::Warning => {
                        security.warnings.push(finding);
                        security.score -= 5;
                    }
                }
            }
        }
    }

    // Hardcoded secrets, one penalty per file at most
    for file in files_with_ext(plugin_path, &["py", "js", "ts", "json", "yml", "yaml"]) {
        let Ok(content) = FileReader::read_to_string(&file) else {
            continue;
        };

        for regex in SECRET_PATTERNS.iter() {
            if regex.is_match(&content) {
                security
                    .issues
                    .push(format!("{}: Potential hardcoded secret", file_label(&file)));
                security.score -= 30;
                break;
            }
        }
    }

    security.score = security.score.clamp(0, 100);

    if security.issues.is_empty() && security.warnings.is_empty() {
        security
            .passes
            .push("No critical security issues found".to_string());
    }

    security
}
