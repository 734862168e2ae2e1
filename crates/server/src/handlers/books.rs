//! Book mirroring and lookup handlers.

use crate::auth::require_session;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{decode_authors, read_json_body};
use crate::mirror::ensure_book_exists;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use serde::{Deserialize, Serialize};
use shelfmark_core::{BookRef, CatalogBookDetails};
use shelfmark_metadata::models::BookRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A mirrored book as returned by the API.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub catalog_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub small_thumbnail_url: Option<String>,
    pub publisher: Option<String>,
    pub publication_date: Option<String>,
    pub page_count: Option<i64>,
    pub language: Option<String>,
    pub avg_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub preview_link: Option<String>,
    pub info_link: Option<String>,
    pub isbn: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

impl BookResponse {
    pub fn from_row(row: BookRow, genres: Vec<String>) -> Self {
        let authors = decode_authors(&row);
        Self {
            id: row.id,
            catalog_id: row.catalog_id,
            title: row.title,
            authors,
            description: row.description,
            cover_image_url: row.cover_image_url,
            small_thumbnail_url: row.small_thumbnail_url,
            publisher: row.publisher,
            publication_date: row.publication_date,
            page_count: row.page_count,
            language: row.language,
            avg_rating: row.avg_rating,
            ratings_count: row.ratings_count,
            preview_link: row.preview_link,
            info_link: row.info_link,
            isbn: row.isbn,
            created_at: row.created_at,
            genres,
        }
    }
}

/// Request to mirror a catalog volume.
#[derive(Debug, Deserialize)]
pub struct MirrorBookRequest {
    pub catalog_id: String,
    pub details: CatalogBookDetails,
}

/// POST /v1/books - mirror a catalog volume locally.
///
/// Idempotent: mirroring an already-known volume returns the stored row
/// without modifying it. No session is required; mirrored books are
/// shared records, not user state.
pub async fn mirror_book(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<BookResponse>> {
    let body: MirrorBookRequest = read_json_body(&state, req).await?;

    // Validates the id shape before it reaches storage
    let BookRef::Catalog(catalog_id) = BookRef::catalog(&body.catalog_id)? else {
        return Err(ApiError::Internal(
            "catalog ref resolved to local".to_string(),
        ));
    };

    let book = ensure_book_exists(&state, &catalog_id, &body.details).await?;
    let genres = state
        .metadata
        .get_book_genres(book.id)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();
    Ok(Json(BookResponse::from_row(book, genres)))
}

/// The caller's shelf placement of a book, when a session is present.
#[derive(Debug, Serialize)]
pub struct ShelfStatus {
    pub shelf_entry_id: Uuid,
    pub shelf_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
}

/// GET /v1/books/{book_id} response.
#[derive(Debug, Serialize)]
pub struct BookDetailResponse {
    #[serde(flatten)]
    pub book: BookResponse,
    /// Present only when the caller has a session and has shelved the book.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelf: Option<ShelfStatus>,
}

/// GET /v1/books/{book_id} - look up a mirrored book.
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
    req: Request,
) -> ApiResult<Json<BookDetailResponse>> {
    let row = state
        .metadata
        .get_book(book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("book {book_id} not found")))?;

    let genres = state
        .metadata
        .get_book_genres(book_id)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();

    let shelf = match require_session(&req) {
        Ok(session) => {
            let entry = state
                .metadata
                .get_shelf_entry_for_book(&session.user_id, book_id)
                .await?;
            match entry {
                Some(entry) => {
                    let review = match entry.review_id {
                        Some(review_id) => {
                            state.metadata.get_review(review_id, &session.user_id).await?
                        }
                        None => None,
                    };
                    let (rating, review_text) = match review {
                        Some(review) => (review.rating, review.review_text),
                        None => (None, None),
                    };
                    Some(ShelfStatus {
                        shelf_entry_id: entry.id,
                        shelf_type: entry.shelf_type,
                        rating,
                        review_text,
                    })
                }
                None => None,
            }
        }
        Err(_) => None,
    };

    Ok(Json(BookDetailResponse {
        book: BookResponse::from_row(row, genres),
        shelf,
    }))
}
