//! Application state shared across handlers.

use shelfmark_catalog::CatalogClient;
use shelfmark_core::config::AppConfig;
use shelfmark_metadata::MetadataStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// External catalog client.
    pub catalog: Arc<CatalogClient>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        catalog: CatalogClient,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata,
            catalog: Arc::new(catalog),
        }
    }
}
