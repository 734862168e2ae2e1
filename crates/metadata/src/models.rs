//! Row types persisted by the metadata store.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A mirrored catalog book. One row per catalog volume; `catalog_id` is
/// unique across the table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BookRow {
    pub id: Uuid,
    pub catalog_id: String,
    pub title: String,
    /// JSON-encoded array of author names, or NULL when unknown.
    pub authors: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub small_thumbnail_url: Option<String>,
    pub publisher: Option<String>,
    /// Normalized ISO date (`YYYY-MM-DD`), or NULL when the catalog's
    /// value could not be normalized.
    pub publication_date: Option<String>,
    pub page_count: Option<i64>,
    pub language: Option<String>,
    pub avg_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub preview_link: Option<String>,
    pub info_link: Option<String>,
    pub isbn: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A genre. Names are unique, case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct GenreRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// A user's shelf entry for one book. At most one row per (user, book).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ShelfEntryRow {
    pub id: Uuid,
    pub user_id: String,
    pub book_id: Uuid,
    /// Stored shelf type string; parsed via `ShelfType::parse`.
    pub shelf_type: String,
    pub date_added: OffsetDateTime,
    pub date_started: Option<OffsetDateTime>,
    pub date_finished: Option<OffsetDateTime>,
    /// Link to the user's review of this book, when one exists.
    pub review_id: Option<Uuid>,
}

/// A user's review of one book.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub user_id: String,
    pub book_id: Uuid,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A user profile. Display names are advisory and may be absent.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub display_name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A review joined with its author's profile, as returned by the public
/// review listing. `display_name` is NULL when the author has no profile.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BookReviewRow {
    pub id: Uuid,
    pub user_id: String,
    pub rating: Option<i64>,
    pub review_text: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub display_name: Option<String>,
}
