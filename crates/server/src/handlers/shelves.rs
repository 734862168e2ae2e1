//! Shelf management handlers.

use crate::auth::require_session;
use crate::error::{ApiError, ApiResult};
use crate::handlers::books::BookResponse;
use crate::handlers::common::read_json_body;
use crate::mirror::resolve_book;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use serde::{Deserialize, Serialize};
use shelfmark_core::{BookRef, CatalogBookDetails, ShelfChange};
use shelfmark_metadata::models::ShelfEntryRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to change a book's shelf membership.
#[derive(Debug, Deserialize)]
pub struct UpdateShelfRequest {
    /// Existing entry to modify. When absent, the entry is located (or
    /// created) via `book`.
    pub shelf_entry_id: Option<Uuid>,
    /// Target shelf, or the pseudo-type "removed".
    pub shelf_type: String,
    /// The book to shelve. Required when `shelf_entry_id` is absent.
    pub book: Option<BookRef>,
    /// Catalog payload for first-sight mirroring of a catalog ref.
    pub details: Option<CatalogBookDetails>,
}

/// A shelf entry as returned by the API.
#[derive(Debug, Serialize)]
pub struct ShelfEntryResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub shelf_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_added: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_id: Option<Uuid>,
}

impl From<ShelfEntryRow> for ShelfEntryResponse {
    fn from(row: ShelfEntryRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            shelf_type: row.shelf_type,
            date_added: row.date_added,
            review_id: row.review_id,
        }
    }
}

/// PUT /v1/shelf response.
#[derive(Debug, Serialize)]
pub struct UpdateShelfResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<ShelfEntryResponse>,
}

/// PUT /v1/shelf - move a book onto a shelf, or remove it.
///
/// Moving an already-shelved book updates its entry in place (resetting
/// `date_added`); shelving an unshelved book creates the entry, mirroring
/// the book first when a catalog ref arrives for an unknown volume.
pub async fn update_shelf(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<UpdateShelfResponse>> {
    let session = require_session(&req)?.clone();
    let body: UpdateShelfRequest = read_json_body(&state, req).await?;

    let change = ShelfChange::parse(&body.shelf_type)?;
    match change {
        ShelfChange::Remove => {
            // Removal always targets an explicit entry. The linked review,
            // if any, is intentionally left in place.
            let entry_id = body.shelf_entry_id.ok_or_else(|| {
                ApiError::BadRequest("shelf_entry_id is required for removal".to_string())
            })?;
            state
                .metadata
                .delete_shelf_entry(entry_id, &session.user_id)
                .await?;
            Ok(Json(UpdateShelfResponse {
                status: "removed".to_string(),
                entry: None,
            }))
        }
        ShelfChange::Move(shelf_type) => {
            let now = OffsetDateTime::now_utc();

            // An explicit entry id means an update, never a create.
            if let Some(entry_id) = body.shelf_entry_id {
                state
                    .metadata
                    .update_shelf_type(entry_id, &session.user_id, shelf_type.as_str(), now)
                    .await?;
                let entry = state
                    .metadata
                    .get_shelf_entry(entry_id, &session.user_id)
                    .await?
                    .ok_or_else(|| {
                        ApiError::Internal(format!("shelf entry {entry_id} missing after update"))
                    })?;
                return Ok(Json(UpdateShelfResponse {
                    status: "updated".to_string(),
                    entry: Some(entry.into()),
                }));
            }

            let book_ref = body
                .book
                .as_ref()
                .ok_or_else(|| ApiError::BadRequest("book is required".to_string()))?;
            let book = resolve_book(&state, book_ref, body.details.as_ref()).await?;

            if let Some(existing) = state
                .metadata
                .get_shelf_entry_for_book(&session.user_id, book.id)
                .await?
            {
                state
                    .metadata
                    .update_shelf_type(existing.id, &session.user_id, shelf_type.as_str(), now)
                    .await?;
                let entry = state
                    .metadata
                    .get_shelf_entry(existing.id, &session.user_id)
                    .await?
                    .ok_or_else(|| {
                        ApiError::Internal(format!(
                            "shelf entry {} missing after update",
                            existing.id
                        ))
                    })?;
                return Ok(Json(UpdateShelfResponse {
                    status: "updated".to_string(),
                    entry: Some(entry.into()),
                }));
            }

            let candidate = ShelfEntryRow {
                id: Uuid::new_v4(),
                user_id: session.user_id.clone(),
                book_id: book.id,
                shelf_type: shelf_type.as_str().to_string(),
                date_added: now,
                date_started: None,
                date_finished: None,
                review_id: None,
            };
            let mut entry = state.metadata.create_shelf_entry(&candidate).await?;

            // A racing shelving of the same book resolves to the winner's
            // entry; move it onto the requested shelf.
            if entry.id != candidate.id && entry.shelf_type != shelf_type.as_str() {
                state
                    .metadata
                    .update_shelf_type(entry.id, &session.user_id, shelf_type.as_str(), now)
                    .await?;
                entry.shelf_type = shelf_type.as_str().to_string();
                entry.date_added = now;
            }
            Ok(Json(UpdateShelfResponse {
                status: "added".to_string(),
                entry: Some(entry.into()),
            }))
        }
    }
}

/// One item of a user's shelf listing.
#[derive(Debug, Serialize)]
pub struct ShelfItemResponse {
    #[serde(flatten)]
    pub entry: ShelfEntryResponse,
    pub book: BookResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
}

/// GET /v1/shelf response.
#[derive(Debug, Serialize)]
pub struct ListShelfResponse {
    pub items: Vec<ShelfItemResponse>,
}

/// GET /v1/shelf - list the caller's shelves, newest additions first.
pub async fn list_shelf(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<ListShelfResponse>> {
    let session = require_session(&req)?.clone();
    let items = state.metadata.list_shelf(&session.user_id).await?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let genres = state
            .metadata
            .get_book_genres(item.book.id)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect();
        let (rating, review_text) = match item.review {
            Some(review) => (review.rating, review.review_text),
            None => (None, None),
        };
        out.push(ShelfItemResponse {
            entry: item.entry.into(),
            book: BookResponse::from_row(item.book, genres),
            rating,
            review_text,
        });
    }
    Ok(Json(ListShelfResponse { items: out }))
}
