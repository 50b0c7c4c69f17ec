//! Maintenance check: activity scoring from repository push recency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scrape::normalize::MaintenanceStatus;

/// Maintenance assessment results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceCheck {
    /// Sub-score in [0, 100]
    pub score: i32,
    /// Activity label
    pub status: MaintenanceStatus,
    /// Raw last-commit timestamp, when known
    pub last_commit: String,
    /// Human-readable commit-frequency bucket
    pub commit_frequency: String,
}

impl Default for MaintenanceCheck {
    fn default() -> Self {
        Self {
            score: score_for_status(MaintenanceStatus::Unknown),
            status: MaintenanceStatus::Unknown,
            last_commit: String::new(),
            commit_frequency: String::new(),
        }
    }
}

/// Fixed score table per maintenance status.
pub fn score_for_status(status: MaintenanceStatus) -> i32 {
    match status {
        MaintenanceStatus::Active => 100,
        MaintenanceStatus::Maintained => 85,
        MaintenanceStatus::Slow => 60,
        MaintenanceStatus::Stale => 30,
        MaintenanceStatus::Unknown => 50,
    }
}

/// Human-readable commit-frequency bucket from days since last commit.
pub fn commit_frequency_bucket(days_since: i64) -> &'static str {
    if days_since < 7 {
        "Very active (< 1 week)"
    } else if days_since < 30 {
        "Active (< 1 month)"
    } else if days_since < 90 {
        "Moderate (< 3 months)"
    } else {
        "Infrequent (3+ months)"
    }
}

/// Assess maintenance from a status label and optional last-commit
/// timestamp (RFC 3339). A malformed timestamp leaves the frequency
/// bucket empty; it never fails the check.
pub fn check_maintenance(status: MaintenanceStatus, last_commit: &str) -> MaintenanceCheck {
    let mut maintenance = MaintenanceCheck {
        score: score_for_status(status),
        status,
        last_commit: last_commit.to_string(),
        commit_frequency: String::new(),
    };

    if !last_commit.is_empty() {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(last_commit) {
            let days_since = (Utc::now() - parsed.with_timezone(&Utc)).num_days();
            maintenance.commit_frequency = commit_frequency_bucket(days_since).to_string();
        }
    }

    maintenance
}
