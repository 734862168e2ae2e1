//! Catalog proxy handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use shelfmark_core::CatalogBookDetails;

/// GET /v1/catalog/search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub start_index: u32,
}

/// One search result: the catalog's id plus the flattened details the
/// mirror would persist.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub catalog_id: String,
    #[serde(flatten)]
    pub details: CatalogBookDetails,
}

/// GET /v1/catalog/search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: i64,
}

/// GET /v1/catalog/search - search the upstream catalog.
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest("query is required".to_string()));
    }

    let page = state.catalog.search_volumes(q, query.start_index).await?;
    let results = page
        .items
        .iter()
        .map(|volume| SearchResult {
            catalog_id: volume.id.clone(),
            details: volume.details(),
        })
        .collect();
    Ok(Json(SearchResponse {
        results,
        total: page.total_items,
    }))
}

/// GET /v1/catalog/volumes/{catalog_id} - fetch one volume from the
/// upstream catalog without mirroring it.
pub async fn get_catalog_volume(
    State(state): State<AppState>,
    Path(catalog_id): Path<String>,
) -> ApiResult<Json<SearchResult>> {
    let volume = state
        .catalog
        .fetch_volume(&catalog_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("catalog volume {catalog_id} not found")))?;
    Ok(Json(SearchResult {
        catalog_id: volume.id.clone(),
        details: volume.details(),
    }))
}
