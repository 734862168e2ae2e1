//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes for mutating endpoints.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_body_size() -> usize {
    256 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_size: default_max_body_size(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Busy timeout in seconds for concurrent write contention.
        #[serde(default = "default_busy_timeout_secs")]
        busy_timeout_secs: u64,
    },
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/shelfmark.db"),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

/// External catalog API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog volumes API.
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Calls are single-attempt; retry, if
    /// any, belongs to the caller's transport.
    #[serde(default = "default_catalog_timeout_secs")]
    pub timeout_secs: u64,
    /// Page size for search requests.
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
}

fn default_catalog_base_url() -> String {
    "https://www.googleapis.com/books/v1".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_search_page_size() -> u32 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            timeout_secs: default_catalog_timeout_secs(),
            search_page_size: default_search_page_size(),
        }
    }
}

impl CatalogConfig {
    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Create a test configuration with an in-tree temp database path and
    /// a catalog endpoint that is never reachable.
    ///
    /// **For testing only.** Tests normally override `metadata.path`.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: MetadataConfig::Sqlite {
                path: PathBuf::from("./test-data/shelfmark.db"),
                busy_timeout_secs: default_busy_timeout_secs(),
            },
            catalog: CatalogConfig {
                // Reserved port; catalog calls in tests are expected to fail fast.
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
                search_page_size: default_search_page_size(),
            },
        }
    }
}
