//! Catalog mirroring: materializing catalog volumes as local book rows.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use shelfmark_core::{
    BookRef, CatalogBookDetails, MAX_GENRES_PER_BOOK, normalize_genre_name,
    normalize_publication_date,
};
use shelfmark_metadata::models::{BookRow, GenreRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Ensure a catalog volume is mirrored locally, returning the stored row.
///
/// Idempotent and race-safe: the first writer for a catalog id wins and
/// every caller sees the winner's row. Genre linking happens only on the
/// insert path; a book that already exists is returned as-is without
/// touching its descriptive fields.
pub async fn ensure_book_exists(
    state: &AppState,
    catalog_id: &str,
    details: &CatalogBookDetails,
) -> ApiResult<BookRow> {
    if let Some(existing) = state.metadata.get_book_by_catalog_id(catalog_id).await? {
        return Ok(existing);
    }

    let now = OffsetDateTime::now_utc();
    let authors = if details.authors.is_empty() {
        None
    } else {
        Some(
            serde_json::to_string(&details.authors)
                .map_err(|e| ApiError::Internal(format!("failed to encode authors: {e}")))?,
        )
    };

    let candidate = BookRow {
        id: Uuid::new_v4(),
        catalog_id: catalog_id.to_string(),
        title: details.title.clone(),
        authors,
        description: details.description.clone(),
        cover_image_url: details.cover_image_url.clone(),
        small_thumbnail_url: details.small_thumbnail_url.clone(),
        publisher: details.publisher.clone(),
        publication_date: details
            .publication_date
            .as_deref()
            .and_then(normalize_publication_date),
        page_count: details.page_count,
        language: details.language.clone(),
        avg_rating: details.avg_rating,
        ratings_count: details.ratings_count,
        preview_link: details.preview_link.clone(),
        info_link: details.info_link.clone(),
        isbn: details.isbn.clone(),
        created_at: now,
        updated_at: now,
    };

    let book = state.metadata.find_or_create_book(&candidate).await?;

    // Link genres only when our insert won; a pre-existing book already
    // had its categories processed.
    if book.id == candidate.id {
        link_genres(state, &book, &details.categories).await;
    }

    Ok(book)
}

/// Link a book to the genres derived from its catalog categories.
///
/// Genre failures are isolated: a failed find-or-create or link is
/// logged and skipped, and never fails the mirroring operation.
async fn link_genres(state: &AppState, book: &BookRow, categories: &[String]) {
    let now = OffsetDateTime::now_utc();
    for raw in categories.iter().take(MAX_GENRES_PER_BOOK) {
        let Some(name) = normalize_genre_name(raw) else {
            continue;
        };

        let candidate = GenreRow {
            id: Uuid::new_v4(),
            name: name.clone(),
            created_at: now,
        };
        let genre = match state.metadata.find_or_create_genre(&candidate).await {
            Ok(genre) => genre,
            Err(e) => {
                tracing::warn!(genre = %name, error = %e, "failed to create genre, skipping");
                continue;
            }
        };

        if let Err(e) = state.metadata.link_book_genre(book.id, genre.id).await {
            tracing::warn!(
                book_id = %book.id,
                genre = %name,
                error = %e,
                "failed to link genre, skipping"
            );
        }
    }
}

/// Resolve a book reference to a mirrored book row.
///
/// Local references must already exist. Catalog references are mirrored
/// on first sight: from caller-supplied details when given, otherwise by
/// fetching the volume from the upstream catalog.
pub async fn resolve_book(
    state: &AppState,
    book_ref: &BookRef,
    details: Option<&CatalogBookDetails>,
) -> ApiResult<BookRow> {
    match book_ref {
        BookRef::Local(id) => state
            .metadata
            .get_book(*id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("book {id} not found"))),
        BookRef::Catalog(catalog_id) => {
            if let Some(book) = state.metadata.get_book_by_catalog_id(catalog_id).await? {
                return Ok(book);
            }
            match details {
                Some(details) => ensure_book_exists(state, catalog_id, details).await,
                None => {
                    let volume = state
                        .catalog
                        .fetch_volume(catalog_id)
                        .await?
                        .ok_or_else(|| {
                            ApiError::NotFound(format!("catalog volume {catalog_id} not found"))
                        })?;
                    ensure_book_exists(state, catalog_id, &volume.details()).await
                }
            }
        }
    }
}
