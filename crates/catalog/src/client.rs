//! HTTP client for the catalog volumes API.

use crate::error::{CatalogError, CatalogResult};
use crate::types::{CatalogVolume, SearchPage};
use reqwest::{StatusCode, Url};
use shelfmark_core::config::CatalogConfig;

/// Client for the external catalog. Calls are single-attempt; the
/// configured timeout bounds each request.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    search_page_size: u32,
}

impl CatalogClient {
    /// Create a client from configuration.
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        // A trailing slash makes Url::join treat the last segment as a
        // directory; without it the final path segment is replaced.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| CatalogError::Url(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url,
            search_page_size: config.search_page_size,
        })
    }

    fn url(&self, path: &str) -> CatalogResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::Url(e.to_string()))
    }

    /// Fetch a single volume by catalog ID. Returns `None` when the
    /// catalog does not know the id.
    pub async fn fetch_volume(&self, volume_id: &str) -> CatalogResult<Option<CatalogVolume>> {
        let url = self.url(&format!("volumes/{volume_id}"))?;
        let response = self.http.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let volume = serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Ok(Some(volume))
    }

    /// Search the catalog. `start_index` is a zero-based offset into the
    /// result set; page size comes from configuration.
    pub async fn search_volumes(
        &self,
        query: &str,
        start_index: u32,
    ) -> CatalogResult<SearchPage> {
        let mut url = self.url("volumes")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("startIndex", &start_index.to_string())
            .append_pair("maxResults", &self.search_page_size.to_string());

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}
