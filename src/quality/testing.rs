//! Testing check: test suite and CI configuration detection.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Test directories checked by convention, with the framework each implies.
const TEST_DIRS: &[(&str, &str)] = &[
    ("tests", "pytest"),
    ("test", "pytest"),
    ("__tests__", "jest"),
    ("spec", "rspec"),
];

/// Well-known CI configuration files and directories.
const CI_CONFIGS: &[&str] = &[
    ".github/workflows",
    ".circleci",
    ".travis.yml",
    "azure-pipelines.yml",
    "Jenkinsfile",
];

static TEST_FILE_GLOBS: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in ["test_*.py", "*_test.py", "*.test.js", "*.spec.js"] {
        builder.add(Glob::new(pattern).expect("valid glob"));
    }
    builder.build().expect("valid glob set")
});

/// Testing assessment results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestingCheck {
    /// Sub-score in [0, 100]
    pub score: i32,
    /// Any test directory or test file found
    pub has_tests: bool,
    /// Any CI configuration found
    pub has_ci: bool,
    /// Framework implied by the test directory convention
    pub test_framework: String,
    /// Gaps found
    pub issues: Vec<String>,
}

/// Assess testing infrastructure of a plugin tree: +50 for tests, +50 for
/// CI configuration.
pub fn check_testing(plugin_path: &Path) -> TestingCheck {
    let mut testing = TestingCheck::default();

    for (dir, framework) in TEST_DIRS {
        if plugin_path.join(dir).is_dir() {
            testing.has_tests = true;
            testing.test_framework = (*framework).to_string();
            break;
        }
    }

    if !testing.has_tests {
        let found = WalkDir::new(plugin_path)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .any(|e| TEST_FILE_GLOBS.is_match(Path::new(e.file_name())));
        if found {
            testing.has_tests = true;
        }
    }

    testing.has_ci = CI_CONFIGS.iter().any(|ci| plugin_path.join(ci).exists());

    let mut score = 0;
    if testing.has_tests {
        score += 50;
    } else {
        testing.issues.push("No automated tests found".to_string());
    }

    if testing.has_ci {
        score += 50;
    } else {
        testing
            .issues
            .push("No CI/CD configuration found".to_string());
    }

    testing.score = score;
    testing
}
