//! End-to-end pipeline tests: feed payload parsing, priority merge,
//! export, and search over the exported index.

use indexmap::IndexMap;
use serde_json::json;
use tempfile::TempDir;

use plugdex::core::config::PlugdexConfig;
use plugdex::io::exports::{export_site_data, search_index_path, SearchIndexEntry};
use plugdex::scrape::scraper::parse_feed_payload;
use plugdex::scrape::sources::{Category, PluginSource, SourceFormat};
use plugdex::search::{SearchEngine, SearchService};
use plugdex::CanonicalPlugin;

fn source(name: &str, priority: i32, official: bool) -> PluginSource {
    PluginSource {
        name: name.to_string(),
        url: format!("https://example.com/{name}.json"),
        format: SourceFormat::RawJson,
        official,
        priority,
    }
}

const TEMPLATE: &str = "https://github.com/upstream/repo/tree/main/plugins/{path}";

fn merge(feeds: Vec<Vec<CanonicalPlugin>>) -> Vec<CanonicalPlugin> {
    let mut merged: IndexMap<String, CanonicalPlugin> = IndexMap::new();
    for plugin in feeds.into_iter().flatten() {
        match merged.get_mut(&plugin.slug) {
            Some(existing) => existing.backfill_from(&plugin),
            None => {
                merged.insert(plugin.slug.clone(), plugin);
            }
        }
    }
    merged.into_values().collect()
}

#[test]
fn feed_records_normalize_and_categorize() {
    let payload = json!([
        {
            "name": "Docker Deploy",
            "description": "Deploy containers to kubernetes clusters",
            "keywords": ["docker", "deployment"],
            "source": "./plugins/docker-deploy"
        },
        {
            "name": "Security Scanner",
            "description": "Scans dependencies for vulnerabilities",
            "category": "security"
        }
    ]);

    let plugins = parse_feed_payload(&payload, &source("community", 80, false), TEMPLATE);
    assert_eq!(plugins.len(), 2, "both records should normalize");

    let docker = &plugins[0];
    assert_eq!(docker.slug, "docker-deploy");
    assert_eq!(docker.category, Category::Devops);
    assert_eq!(
        docker.repository_url,
        "https://github.com/upstream/repo/tree/main/plugins/docker-deploy",
        "relative source paths should synthesize repository URLs"
    );

    assert_eq!(plugins[1].category, Category::Security);
}

#[test]
fn priority_merge_keeps_official_fields() {
    let official = parse_feed_payload(
        &json!([{"name": "Shared Plugin", "description": "official description"}]),
        &source("official", 100, true),
        TEMPLATE,
    );
    let community = parse_feed_payload(
        &json!([
            {
                "name": "Shared Plugin",
                "description": "community description",
                "version": "2.1.0",
                "homepage": "https://community.example",
                "keywords": "extra, tags"
            },
            {"name": "Community Only"}
        ]),
        &source("community", 80, false),
        TEMPLATE,
    );

    let merged = merge(vec![official, community]);
    assert_eq!(merged.len(), 2);

    let shared = merged
        .iter()
        .find(|p| p.slug == "shared-plugin")
        .expect("merged record present");
    assert_eq!(shared.description, "official description");
    assert_eq!(shared.homepage_url, "https://community.example");
    assert_eq!(shared.keywords, "extra,tags");
    assert!(shared.is_verified);
    // "0.0.0" counts as populated, so the community version is not taken
    assert_eq!(shared.version, "0.0.0");

    let community_only = merged
        .iter()
        .find(|p| p.slug == "community-only")
        .expect("unique record present");
    assert!(!community_only.is_verified);
}

#[tokio::test]
async fn exported_index_serves_local_search() {
    let temp = TempDir::new().unwrap();
    let mut config = PlugdexConfig::default();
    config.export.output_dir = temp.path().to_path_buf();

    let plugins = parse_feed_payload(
        &json!([
            {
                "name": "Docker Deploy",
                "description": "Deploy containers to kubernetes",
                "keywords": ["docker"]
            },
            {
                "name": "Test Runner",
                "description": "Runs pytest suites on save",
                "keywords": ["testing"]
            }
        ]),
        &source("community", 80, false),
        TEMPLATE,
    );

    let (plugins_path, index_path) = export_site_data(&plugins, &config.export).unwrap();
    assert!(plugins_path.is_file());
    assert_eq!(index_path, search_index_path(&config.export));

    let entries: Vec<SearchIndexEntry> =
        serde_json::from_str(&std::fs::read_to_string(&index_path).unwrap()).unwrap();
    assert_eq!(entries.len(), 2);

    // Service is unreachable in tests, so search degrades to the index.
    let service = SearchService::new(&config).unwrap();
    let results = service.search("pytest", 10).await.unwrap();
    assert_eq!(results.engine, SearchEngine::Local);
    assert_eq!(results.total, 1);
    assert_eq!(results.hits[0].name, "Test Runner");
}

#[test]
fn suggest_completes_plugin_names() {
    let temp = TempDir::new().unwrap();
    let mut config = PlugdexConfig::default();
    config.export.output_dir = temp.path().to_path_buf();

    let plugins = parse_feed_payload(
        &json!([
            {"name": "Docker Deploy"},
            {"name": "Docs Helper"},
            {"name": "Linter"}
        ]),
        &source("community", 80, false),
        TEMPLATE,
    );
    export_site_data(&plugins, &config.export).unwrap();

    let service = SearchService::new(&config).unwrap();
    let suggestions = service.suggest("doc", 10).unwrap();
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| s.to_lowercase().starts_with("doc")));
}
