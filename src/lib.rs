//! # Plugdex: Plugin Directory Scraper & Quality Analyzer
//!
//! A toolkit for building a directory of Claude Code plugins. This library
//! provides:
//!
//! - **Feed Scraping**: fetch plugin metadata from remote JSON feeds,
//!   normalize it into a canonical schema, and merge records from multiple
//!   sources by priority
//! - **Enrichment**: attach GitHub popularity metrics and a maintenance
//!   status derived from push recency
//! - **Quality Reports**: heuristic security/maintenance/documentation/
//!   testing scoring over a plugin's file tree
//! - **Static Export**: JSON artifacts consumed by static-site builds and
//!   the offline search index
//! - **Search**: search-service queries with a local-index fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plugdex::{PlugdexConfig, PluginScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlugdexConfig::default();
//!     let scraper = PluginScraper::new(&config)?;
//!     let plugins = scraper.scrape_all().await;
//!
//!     println!("scraped {} plugins", plugins.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Core configuration, errors, and file utilities
pub mod core {
    //! Configuration, error types, and shared file utilities.

    pub mod config;
    pub mod errors;
    pub mod file_utils;
}

// Feed scraping pipeline
pub mod scrape {
    //! Feed scraping: source registry, normalization, enrichment, and the
    //! merge orchestrator.

    pub mod enrich;
    pub mod normalize;
    pub mod scraper;
    pub mod sources;
}

// Quality report analyzer
pub mod quality {
    //! Heuristic quality scoring over a plugin's file tree.

    pub mod components;
    pub mod documentation;
    pub mod maintenance;
    pub mod report;
    pub mod security;
    pub mod testing;
}

// Search service integration with local fallback
pub mod search;

// Static export and report rendering
pub mod io {
    //! Static JSON export and quality-report rendering.

    pub mod exports;
    pub mod reports;
}

// Re-export primary types for convenience
pub use crate::core::config::PlugdexConfig;
pub use crate::core::errors::{PlugdexError, Result};
pub use crate::quality::report::{QualityAnalyzer, QualityReport};
pub use crate::scrape::normalize::{CanonicalPlugin, MaintenanceStatus};
pub use crate::scrape::scraper::PluginScraper;
pub use crate::scrape::sources::{Category, PluginSource};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
