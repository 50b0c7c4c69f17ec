//! Command execution logic for the plugdex CLI.

use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};
use tracing::info;

use plugdex::core::config::PlugdexConfig;
use plugdex::io::exports::{data_dir, export_site_data, PluginsExport};
use plugdex::io::reports::{render_json, render_markdown, write_report};
use plugdex::quality::report::QualityAnalyzer;
use plugdex::search::SearchService;
use plugdex::PluginScraper;

use crate::cli::args::*;
use crate::cli::output::*;

/// Load configuration from an optional file path, falling back to the
/// defaults, and validate it.
pub async fn load_configuration(config_path: Option<&Path>) -> anyhow::Result<PlugdexConfig> {
    let config = match config_path {
        Some(path) => PlugdexConfig::from_yaml_file(path)?,
        None => PlugdexConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Main scrape command: fetch all sources, merge, enrich, export.
pub async fn scrape_command(args: ScrapeArgs) -> anyhow::Result<()> {
    if !args.quiet {
        print_header();
    }

    let mut config = load_configuration(args.config.as_deref()).await?;

    if let Some(out) = args.out {
        config.export.output_dir = out;
    }
    if let Some(limit) = args.enrich_limit {
        config.scraper.enrich_limit = limit;
    }
    if args.github_token.is_some() {
        config.github.token = args.github_token;
    }
    config.validate()?;

    if !args.quiet {
        display_config_summary(&config);
    }

    let scraper = PluginScraper::new(&config)?;

    let plugins = if args.quiet {
        scraper.scrape_all().await
    } else {
        let pb = spinner("Scraping sources...")?;
        let mut plugins = scraper.scrape_merged().await;
        pb.finish_with_message(format!("Scraped {} plugins", plugins.len()));

        // Enrichment is sequential and rate-limited; show per-plugin
        // progress for the slice that gets enriched.
        let limit = config.scraper.enrich_limit.min(plugins.len());
        let enrich_pb = enrich_progress_bar(limit as u64)?;
        for plugin in plugins.iter_mut().take(limit) {
            enrich_pb.set_message(plugin.name.clone());
            scraper.enrich(plugin).await;
            enrich_pb.inc(1);
        }
        enrich_pb.finish_with_message(format!("Enriched {limit} plugins"));
        plugins
    };

    if !args.quiet {
        println!();
        display_scrape_summary(&plugins);
    }

    if args.no_export {
        info!("Export skipped (--no-export)");
        return Ok(());
    }

    let (plugins_path, index_path) = export_site_data(&plugins, &config.export)?;
    if !args.quiet {
        println!("📄 Plugin data: {}", plugins_path.display().to_string().cyan());
        println!("📄 Search index: {}", index_path.display().to_string().cyan());
    }

    Ok(())
}

/// Generate a quality report for a local plugin tree or a repository URL.
pub async fn quality_command(args: QualityArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.config.as_deref()).await?;
    if args.github_token.is_some() {
        config.github.token = args.github_token;
    }

    let analyzer = QualityAnalyzer::new(&config)?;

    let pb = spinner(&format!("Analyzing {}...", args.target))?;
    let report = analyzer.analyze(&args.target).await?;
    pb.finish_and_clear();

    display_quality_summary(&report);

    let rendered = match args.format {
        ReportFormat::Markdown => render_markdown(&report),
        ReportFormat::Json => render_json(&report)?,
    };

    match args.output {
        Some(path) => {
            write_report(&rendered, &path)?;
            println!(
                "{} {}",
                "📄 Report written to:".bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Rebuild export artifacts from an existing plugin export.
pub async fn export_command(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.config.as_deref()).await?;

    let input = args
        .input
        .unwrap_or_else(|| data_dir(&config.export).join(&config.export.plugins_file));

    let content = tokio::fs::read_to_string(&input).await.map_err(|e| {
        anyhow::anyhow!("failed to read plugin export {}: {e}", input.display())
    })?;
    let export: PluginsExport = serde_json::from_str(&content)?;

    if let Some(out) = args.out {
        config.export.output_dir = out;
    }

    let (plugins_path, index_path) = export_site_data(&export.plugins, &config.export)?;
    println!(
        "{} {} plugins",
        "✅ Re-exported".bright_green().bold(),
        export.plugins.len()
    );
    println!("📄 Plugin data: {}", plugins_path.display().to_string().cyan());
    println!("📄 Search index: {}", index_path.display().to_string().cyan());

    Ok(())
}

/// Search the plugin directory.
pub async fn search_command(args: SearchArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref()).await?;
    let service = SearchService::new(&config)?;

    let results = if args.local {
        service.search_local(&args.query, args.limit)?
    } else {
        service.search(&args.query, args.limit).await?
    };

    display_search_results(&results);
    Ok(())
}

/// Print default configuration in YAML format.
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default plugdex configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!("{}", "# Usage: plugdex scrape --config your-config.yml".dimmed());
    println!();

    let config = PlugdexConfig::default();
    let yaml_output = serde_yaml::to_string(&config)?;
    println!("{yaml_output}");

    Ok(())
}

/// Initialize a configuration file with defaults.
pub async fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        eprintln!(
            "{} {}",
            "❌ Configuration file already exists:".red(),
            args.output.display()
        );
        eprintln!("   Use --force to overwrite or choose a different name with --output");
        std::process::exit(1);
    }

    let config = PlugdexConfig::default();
    config.to_yaml_file(&args.output)?;

    println!(
        "{} {}",
        "✅ Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    println!("{}", "🔧 Key settings you can customize:".bright_blue().bold());

    #[derive(Tabled)]
    struct CustomizationRow {
        setting: String,
        description: String,
    }

    let customization_rows = vec![
        CustomizationRow {
            setting: "scraper.sources".to_string(),
            description: "Plugin feeds to scrape, merged by priority".to_string(),
        },
        CustomizationRow {
            setting: "scraper.enrich_limit".to_string(),
            description: "How many plugins get GitHub enrichment per run".to_string(),
        },
        CustomizationRow {
            setting: "export.output_dir".to_string(),
            description: "Where exported JSON artifacts are written".to_string(),
        },
        CustomizationRow {
            setting: "search.url".to_string(),
            description: "External search service endpoint".to_string(),
        },
    ];

    let mut table = Table::new(customization_rows);
    table.with(TableStyle::rounded());
    println!("{table}");

    Ok(())
}

/// Validate a plugdex configuration file.
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "🔍 Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let config = match load_configuration(Some(&args.config)).await {
        Ok(config) => {
            println!("{}", "✅ Configuration file is valid!".bright_green().bold());
            println!();
            config
        }
        Err(e) => {
            eprintln!("{} {}", "❌ Configuration validation failed:".red(), e);
            println!();
            println!("{}", "🔧 Common issues:".bright_blue().bold());
            println!("   • Check YAML syntax (indentation, colons, quotes)");
            println!("   • Every source needs a non-empty URL");
            println!("   • The repository template must contain {{path}}");
            println!();
            println!(
                "{}",
                "💡 Tip: Use 'plugdex print-default-config' to see valid format".dimmed()
            );
            std::process::exit(1);
        }
    };

    display_config_summary(&config);

    if args.verbose {
        println!("{}", "🔧 Configured Sources".bright_blue().bold());
        println!();

        #[derive(Tabled)]
        struct SourceRow {
            name: String,
            priority: i32,
            official: bool,
            url: String,
        }

        let rows: Vec<SourceRow> = config
            .scraper
            .sources
            .iter()
            .map(|s| SourceRow {
                name: s.name.clone(),
                priority: s.priority,
                official: s.official,
                url: s.url.clone(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        println!("{table}");
    }

    Ok(())
}
