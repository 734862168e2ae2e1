//! Genre repository.

use crate::error::MetadataResult;
use crate::models::GenreRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for genres and book-genre links.
#[async_trait]
pub trait GenreRepo: Send + Sync {
    /// Insert a genre if no row with the same name exists, then return
    /// the stored row. Name comparison is case-sensitive.
    async fn find_or_create_genre(&self, genre: &GenreRow) -> MetadataResult<GenreRow>;

    /// Link a book to a genre. Idempotent; relinking is a no-op.
    async fn link_book_genre(&self, book_id: Uuid, genre_id: Uuid) -> MetadataResult<()>;

    /// List the genres linked to a book, ordered by name.
    async fn get_book_genres(&self, book_id: Uuid) -> MetadataResult<Vec<GenreRow>>;
}
