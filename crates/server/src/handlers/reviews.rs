//! Review ledger handlers.

use crate::auth::require_session;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::read_json_body;
use crate::mirror::resolve_book;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Request, State};
use serde::{Deserialize, Serialize};
use shelfmark_core::{
    BookRef, CatalogBookDetails, MAX_REVIEW_TEXT_LEN, Rating, ShelfType, review_has_content,
};
use shelfmark_metadata::models::{ReviewRow, ShelfEntryRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Request to write (or clear) the caller's review of a book.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    /// The book under review. May be omitted when `shelf_entry_id` is
    /// given; the entry then supplies the book.
    pub book: Option<BookRef>,
    /// Catalog payload for first-sight mirroring of a catalog ref.
    pub details: Option<CatalogBookDetails>,
    /// Existing shelf entry governing the review, when the caller holds
    /// one.
    pub shelf_entry_id: Option<Uuid>,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
}

/// A review as returned to its author.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ReviewRow> for ReviewResponse {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            rating: row.rating,
            review_text: row.review_text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PUT /v1/reviews response.
#[derive(Debug, Serialize)]
pub struct UpdateReviewResponse {
    pub status: String,
    pub shelf_entry_id: Uuid,
    pub book_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewResponse>,
}

/// PUT /v1/reviews - write, overwrite, or clear the caller's review.
///
/// A review exists only while it carries content (a rating or non-blank
/// text); writing empty content deletes it. Reviewing a book the caller
/// has not shelved first places it on the "read" shelf, and the shelf
/// entry's review link is kept in step with the review itself.
pub async fn update_review(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<UpdateReviewResponse>> {
    let session = require_session(&req)?.clone();
    let body: UpdateReviewRequest = read_json_body(&state, req).await?;

    let rating = body.rating.map(Rating::new).transpose()?;
    if let Some(text) = &body.review_text {
        if text.len() > MAX_REVIEW_TEXT_LEN {
            return Err(shelfmark_core::Error::ReviewTextTooLong {
                len: text.len(),
                max: MAX_REVIEW_TEXT_LEN,
            }
            .into());
        }
    }

    // Blank text is stored as NULL, never as an empty string; the
    // public listing filters on text presence.
    let review_text = body
        .review_text
        .as_deref()
        .filter(|t| !t.trim().is_empty());

    let now = OffsetDateTime::now_utc();

    // Governing shelf entry: an explicit id, else the entry for the
    // book, else a lazily created one. Reviewing implies having read
    // the book.
    let entry = match body.shelf_entry_id {
        Some(entry_id) => state
            .metadata
            .get_shelf_entry(entry_id, &session.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("shelf entry {entry_id} not found")))?,
        None => {
            let book_ref = body
                .book
                .as_ref()
                .ok_or_else(|| ApiError::BadRequest("book is required".to_string()))?;
            let book = resolve_book(&state, book_ref, body.details.as_ref()).await?;
            match state
                .metadata
                .get_shelf_entry_for_book(&session.user_id, book.id)
                .await?
            {
                Some(entry) => entry,
                None => {
                    let candidate = ShelfEntryRow {
                        id: Uuid::new_v4(),
                        user_id: session.user_id.clone(),
                        book_id: book.id,
                        shelf_type: ShelfType::Read.as_str().to_string(),
                        date_added: now,
                        date_started: None,
                        date_finished: None,
                        review_id: None,
                    };
                    state.metadata.create_shelf_entry(&candidate).await?
                }
            }
        }
    };

    let has_content = review_has_content(rating, review_text);
    let existing = match entry.review_id {
        Some(review_id) => state.metadata.get_review(review_id, &session.user_id).await?,
        None => None,
    };

    match (existing, has_content) {
        (Some(review), true) => {
            state
                .metadata
                .update_review(
                    review.id,
                    &session.user_id,
                    rating.map(Rating::get),
                    review_text,
                    now,
                )
                .await?;
            state
                .metadata
                .set_entry_review(entry.id, &session.user_id, Some(review.id))
                .await?;
            let updated = state
                .metadata
                .get_review(review.id, &session.user_id)
                .await?
                .ok_or_else(|| {
                    ApiError::Internal(format!("review {} missing after update", review.id))
                })?;
            Ok(Json(UpdateReviewResponse {
                status: "saved".to_string(),
                shelf_entry_id: entry.id,
                book_id: entry.book_id,
                review: Some(updated.into()),
            }))
        }
        (Some(review), false) => {
            state
                .metadata
                .delete_review(review.id, &session.user_id)
                .await?;
            state
                .metadata
                .set_entry_review(entry.id, &session.user_id, None)
                .await?;
            Ok(Json(UpdateReviewResponse {
                status: "deleted".to_string(),
                shelf_entry_id: entry.id,
                book_id: entry.book_id,
                review: None,
            }))
        }
        (None, true) => {
            let review = ReviewRow {
                id: Uuid::new_v4(),
                user_id: session.user_id.clone(),
                book_id: entry.book_id,
                rating: rating.map(Rating::get),
                review_text: review_text.map(str::to_string),
                created_at: now,
                updated_at: now,
            };
            state.metadata.create_review(&review).await?;
            state
                .metadata
                .set_entry_review(entry.id, &session.user_id, Some(review.id))
                .await?;
            Ok(Json(UpdateReviewResponse {
                status: "saved".to_string(),
                shelf_entry_id: entry.id,
                book_id: entry.book_id,
                review: Some(review.into()),
            }))
        }
        (None, false) => Ok(Json(UpdateReviewResponse {
            status: "empty".to_string(),
            shelf_entry_id: entry.id,
            book_id: entry.book_id,
            review: None,
        })),
    }
}

/// One review in the public listing for a book.
#[derive(Debug, Serialize)]
pub struct BookReviewResponse {
    pub id: Uuid,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
    pub reviewer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// GET /v1/books/{book_id}/reviews response.
#[derive(Debug, Serialize)]
pub struct ListBookReviewsResponse {
    pub reviews: Vec<BookReviewResponse>,
}

/// GET /v1/books/{book_id}/reviews - list the written reviews of a book.
///
/// Rating-only reviews are excluded; reviewers without a profile display
/// name appear as "Anonymous". Newest first. A book with no written
/// reviews, known or not, yields an empty listing rather than an error.
pub async fn list_book_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> ApiResult<Json<ListBookReviewsResponse>> {
    let rows = state.metadata.list_book_reviews(book_id).await?;
    let reviews = rows
        .into_iter()
        .map(|row| BookReviewResponse {
            id: row.id,
            rating: row.rating,
            review_text: row.review_text,
            reviewer: row
                .display_name
                .unwrap_or_else(|| "Anonymous".to_string()),
            created_at: row.created_at,
        })
        .collect();
    Ok(Json(ListBookReviewsResponse { reviews }))
}
