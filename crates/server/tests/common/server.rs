//! Server test utilities.

use shelfmark_catalog::CatalogClient;
use shelfmark_core::config::{AppConfig, MetadataConfig};
use shelfmark_metadata::{MetadataStore, SqliteStore};
use shelfmark_server::{AppState, create_router};
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with a temporary database. The catalog
    /// client points at an unreachable endpoint; tests exercise the
    /// mirror by supplying details inline.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = temp_dir.path().join("metadata.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path, 5)
                .await
                .expect("Failed to create metadata store"),
        );

        let mut config = AppConfig::for_testing();
        config.metadata = MetadataConfig::Sqlite {
            path: db_path,
            busy_timeout_secs: 5,
        };

        let catalog =
            CatalogClient::new(&config.catalog).expect("Failed to build catalog client");

        let state = AppState::new(config, metadata, catalog);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }
}
