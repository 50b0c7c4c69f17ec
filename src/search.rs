//! Search with graceful degradation: queries go to an external search
//! service first and fall back to a substring scan over the exported
//! search index when the service is down or slow.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::PlugdexConfig;
use crate::core::errors::{PlugdexError, Result};
use crate::io::exports::{search_index_path, SearchIndexEntry};

/// Index name registered with the search service.
const INDEX_UID: &str = "plugins";

/// Which engine produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    /// External search service
    Service,
    /// Local substring scan over the exported index
    Local,
}

/// Result set for one query, shaped identically for both engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// The query as received
    pub query: String,
    /// Matching entries, best first
    pub hits: Vec<SearchIndexEntry>,
    /// Total matches before the limit was applied
    pub total: usize,
    /// Engine that answered
    pub engine: SearchEngine,
}

#[derive(Serialize)]
struct MultiSearchRequest<'a> {
    queries: Vec<ServiceQuery<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceQuery<'a> {
    index_uid: &'a str,
    q: &'a str,
    limit: usize,
}

#[derive(Deserialize)]
struct MultiSearchResponse {
    results: Vec<ServiceResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceResult {
    hits: Vec<SearchIndexEntry>,
    #[serde(default)]
    estimated_total_hits: usize,
}

/// Search front-end with service-first, local-fallback semantics.
pub struct SearchService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    index_path: PathBuf,
}

impl SearchService {
    /// Create a new search service from the pipeline configuration.
    pub fn new(config: &PlugdexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.scraper.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.search.url.trim_end_matches('/').to_string(),
            api_key: config.search.api_key.clone(),
            timeout: Duration::from_millis(config.search.timeout_ms),
            index_path: search_index_path(&config.export),
        })
    }

    /// Run a query. The external service answers when it responds within
    /// the configured timeout; otherwise the exported index is scanned
    /// locally. Fails only when both paths are unavailable.
    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        match tokio::time::timeout(self.timeout, self.search_service(query, limit)).await {
            Ok(Ok(results)) => Ok(results),
            Ok(Err(e)) => {
                warn!(error = %e, "Search service failed, using local index");
                self.search_local(query, limit)
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Search service timed out, using local index");
                self.search_local(query, limit)
            }
        }
    }

    async fn search_service(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let url = format!("{}/multi-search", self.base_url);
        let body = MultiSearchRequest {
            queries: vec![ServiceQuery {
                index_uid: INDEX_UID,
                q: query,
                limit,
            }],
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?.error_for_status()?;
        let mut parsed = response.json::<MultiSearchResponse>().await?;

        let result = if parsed.results.is_empty() {
            return Err(PlugdexError::search("service returned no result sets"));
        } else {
            parsed.results.swap_remove(0)
        };

        debug!(query = %query, hits = result.hits.len(), "Search service answered");
        Ok(SearchResults {
            query: query.to_string(),
            total: result.estimated_total_hits.max(result.hits.len()),
            hits: result.hits,
            engine: SearchEngine::Service,
        })
    }

    /// Substring scan over the exported index. The index file is already
    /// ordered by star count, so matches come back popular-first.
    pub fn search_local(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let entries = self.load_index()?;
        let needle = query.to_lowercase();

        let matches: Vec<SearchIndexEntry> = entries
            .into_iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.description.to_lowercase().contains(&needle)
                    || entry.category.to_lowercase().contains(&needle)
                    || entry.author.to_lowercase().contains(&needle)
            })
            .collect();

        let total = matches.len();
        Ok(SearchResults {
            query: query.to_string(),
            hits: matches.into_iter().take(limit).collect(),
            total,
            engine: SearchEngine::Local,
        })
    }

    /// Plugin-name completions for a prefix, from the local index.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let needle = prefix.to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self.load_index()?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.name.to_lowercase().starts_with(&needle))
            .map(|entry| entry.name)
            .take(limit)
            .collect())
    }

    fn load_index(&self) -> Result<Vec<SearchIndexEntry>> {
        let content = std::fs::read_to_string(&self.index_path).map_err(|_| {
            PlugdexError::search(format!(
                "search index not found at {} (run an export first)",
                self.index_path.display()
            ))
        })?;

        serde_json::from_str(&content).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, description: &str, stars: u64) -> SearchIndexEntry {
        SearchIndexEntry {
            slug: name.to_lowercase(),
            name: name.to_string(),
            description: description.to_string(),
            category: "devops".to_string(),
            author: "Author".to_string(),
            stars,
            verified: false,
        }
    }

    fn service_with_index(entries: &[SearchIndexEntry]) -> (TempDir, SearchService) {
        let temp = TempDir::new().unwrap();
        let mut config = PlugdexConfig::default();
        config.export.output_dir = temp.path().to_path_buf();

        let dir = temp.path().join("data");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("search-index.json"),
            serde_json::to_string(entries).unwrap(),
        )
        .unwrap();

        let service = SearchService::new(&config).unwrap();
        (temp, service)
    }

    #[test]
    fn test_local_search_matches_substrings() {
        let (_temp, service) = service_with_index(&[
            entry("Docker Deploy", "Container deployment helper", 100),
            entry("Test Runner", "Runs your tests", 50),
        ]);

        let results = service.search_local("docker", 10).unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].name, "Docker Deploy");
        assert_eq!(results.engine, SearchEngine::Local);
    }

    #[test]
    fn test_local_search_scans_descriptions() {
        let (_temp, service) = service_with_index(&[
            entry("Alpha", "linting and formatting", 1),
            entry("Beta", "nothing relevant", 2),
        ]);

        let results = service.search_local("linting", 10).unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].name, "Alpha");
    }

    #[test]
    fn test_local_search_respects_limit() {
        let entries: Vec<SearchIndexEntry> = (0..5)
            .map(|i| entry(&format!("Plugin{i}"), "shared description", 0))
            .collect();
        let (_temp, service) = service_with_index(&entries);

        let results = service.search_local("shared", 2).unwrap();
        assert_eq!(results.total, 5);
        assert_eq!(results.hits.len(), 2);
    }

    #[test]
    fn test_local_search_missing_index_errors() {
        let temp = TempDir::new().unwrap();
        let mut config = PlugdexConfig::default();
        config.export.output_dir = temp.path().to_path_buf();

        let service = SearchService::new(&config).unwrap();
        assert!(service.search_local("anything", 10).is_err());
    }

    #[test]
    fn test_suggest_prefix_matching() {
        let (_temp, service) = service_with_index(&[
            entry("Docker Deploy", "a", 1),
            entry("Docs Helper", "b", 2),
            entry("Test Runner", "c", 3),
        ]);

        let suggestions = service.suggest("doc", 10).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.contains(&"Docker Deploy".to_string()));

        assert!(service.suggest("", 10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_falls_back_when_service_unreachable() {
        let (_temp, service) = service_with_index(&[entry("Fallback", "works offline", 9)]);
        // Default config points at localhost:7700; nothing listens there
        // in tests, so the service path errors and the scan answers.
        let results = service.search("fallback", 10).await.unwrap();
        assert_eq!(results.engine, SearchEngine::Local);
        assert_eq!(results.hits.len(), 1);
    }
}
