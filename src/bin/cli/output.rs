//! Output formatting and display functions for the plugdex CLI.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use plugdex::core::config::PlugdexConfig;
use plugdex::quality::report::QualityReport;
use plugdex::search::{SearchEngine, SearchResults};
use plugdex::CanonicalPlugin;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the CLI banner.
pub fn print_header() {
    println!();
    println!(
        "{} {}",
        "🔌 Plugdex".bright_blue().bold(),
        format!("v{}", VERSION).dimmed()
    );
    println!("{}", "Claude Code plugin directory toolkit".dimmed());
    println!();
}

/// Spinner with a steady tick for long-running steps.
pub fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.blue} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Progress bar for the sequential GitHub enrichment pass.
pub fn enrich_progress_bar(total: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.blue} Enriching [{bar:30.cyan/blue}] {pos}/{len} {msg}",
    )?);
    Ok(pb)
}

/// Display a summary of the active configuration.
pub fn display_config_summary(config: &PlugdexConfig) {
    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();

    #[derive(Tabled)]
    struct SettingRow {
        setting: String,
        value: String,
    }

    let rows = vec![
        SettingRow {
            setting: "Sources".to_string(),
            value: config.scraper.sources.len().to_string(),
        },
        SettingRow {
            setting: "Enrich limit".to_string(),
            value: config.scraper.enrich_limit.to_string(),
        },
        SettingRow {
            setting: "HTTP timeout".to_string(),
            value: format!("{}s", config.scraper.timeout_secs),
        },
        SettingRow {
            setting: "GitHub token".to_string(),
            value: if config.github.token.is_some() {
                "configured".to_string()
            } else {
                "not set (low rate limit)".to_string()
            },
        },
        SettingRow {
            setting: "Export directory".to_string(),
            value: config.export.output_dir.display().to_string(),
        },
        SettingRow {
            setting: "Search service".to_string(),
            value: config.search.url.clone(),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
    println!();
}

/// Display scrape results with per-source and enrichment counts.
pub fn display_scrape_summary(plugins: &[CanonicalPlugin]) {
    println!("{}", "✅ Scrape Complete".bright_green().bold());
    println!();

    let verified = plugins.iter().filter(|p| p.is_verified).count();
    let enriched = plugins.iter().filter(|p| p.github_stars.is_some()).count();
    let with_repo = plugins.iter().filter(|p| !p.repository_url.is_empty()).count();

    #[derive(Tabled)]
    struct StatsRow {
        metric: String,
        value: String,
    }

    let rows = vec![
        StatsRow {
            metric: "🔌 Plugins merged".to_string(),
            value: plugins.len().to_string(),
        },
        StatsRow {
            metric: "✅ Verified".to_string(),
            value: verified.to_string(),
        },
        StatsRow {
            metric: "⭐ Enriched with GitHub data".to_string(),
            value: enriched.to_string(),
        },
        StatsRow {
            metric: "🔗 With repository URL".to_string(),
            value: with_repo.to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
    println!();
}

/// Display search results as a table.
pub fn display_search_results(results: &SearchResults) {
    let engine_label = match results.engine {
        SearchEngine::Service => "search service",
        SearchEngine::Local => "local index",
    };

    if results.hits.is_empty() {
        println!(
            "{} {}",
            "No plugins matched".yellow(),
            format!("'{}' (via {})", results.query, engine_label).dimmed()
        );
        return;
    }

    println!(
        "{} {}",
        format!("🔍 {} match(es)", results.total).bright_green().bold(),
        format!("for '{}' via {}", results.query, engine_label).dimmed()
    );
    println!();

    #[derive(Tabled)]
    struct HitRow {
        name: String,
        category: String,
        stars: u64,
        verified: String,
        description: String,
    }

    let rows: Vec<HitRow> = results
        .hits
        .iter()
        .map(|hit| HitRow {
            name: hit.name.clone(),
            category: hit.category.clone(),
            stars: hit.stars,
            verified: if hit.verified { "yes" } else { "" }.to_string(),
            description: truncate(&hit.description, 60),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
}

/// Display a one-screen quality summary before the full report.
pub fn display_quality_summary(report: &QualityReport) {
    let score = report.overall_score;
    let score_display = if score >= 80 {
        format!("🟢 {score}/100")
    } else if score >= 60 {
        format!("🟡 {score}/100")
    } else {
        format!("🔴 {score}/100")
    };

    println!(
        "{} {}",
        format!("📋 {}", report.plugin_name).bright_blue().bold(),
        score_display.bold()
    );
    println!();

    #[derive(Tabled)]
    struct ScoreRow {
        check: String,
        score: String,
    }

    let rows = vec![
        ScoreRow {
            check: "🔒 Security".to_string(),
            score: format!("{}/100", report.security.score),
        },
        ScoreRow {
            check: "🔧 Maintenance".to_string(),
            score: format!("{}/100", report.maintenance.score),
        },
        ScoreRow {
            check: "📚 Documentation".to_string(),
            score: format!("{}/100", report.documentation.score),
        },
        ScoreRow {
            check: "🧪 Testing".to_string(),
            score: format!("{}/100", report.testing.score),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
    println!();

    if !report.recommendations.is_empty() {
        println!(
            "{}",
            format!("💡 {} recommendation(s)", report.recommendations.len()).yellow()
        );
        println!();
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}
