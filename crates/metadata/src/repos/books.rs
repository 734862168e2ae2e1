//! Mirrored book repository.

use crate::error::MetadataResult;
use crate::models::BookRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for mirrored catalog books.
#[async_trait]
pub trait BookRepo: Send + Sync {
    /// Insert a book if no row with the same `catalog_id` exists, then
    /// return the stored row. Concurrent callers racing on the same
    /// catalog id all receive the same row; the loser's insert is a
    /// no-op.
    async fn find_or_create_book(&self, book: &BookRow) -> MetadataResult<BookRow>;

    /// Get a book by its internal ID.
    async fn get_book(&self, book_id: Uuid) -> MetadataResult<Option<BookRow>>;

    /// Get a book by its external catalog ID.
    async fn get_book_by_catalog_id(&self, catalog_id: &str) -> MetadataResult<Option<BookRow>>;
}
