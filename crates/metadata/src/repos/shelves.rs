//! Shelf entry repository.

use crate::error::MetadataResult;
use crate::models::{BookRow, ReviewRow, ShelfEntryRow};
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// A shelf entry joined with its book and the user's review, as returned
/// by the shelf listing.
#[derive(Debug, Clone)]
pub struct ShelfItem {
    pub entry: ShelfEntryRow,
    pub book: BookRow,
    pub review: Option<ReviewRow>,
}

/// Repository for per-user shelf entries.
///
/// All writes that take a `user_id` are scoped: a mismatched user is
/// indistinguishable from a missing row and surfaces as `NotFound`.
#[async_trait]
pub trait ShelfRepo: Send + Sync {
    /// Insert a shelf entry. If the (user, book) pair already has an
    /// entry, the existing row is returned unchanged and the insert is
    /// dropped.
    async fn create_shelf_entry(&self, entry: &ShelfEntryRow) -> MetadataResult<ShelfEntryRow>;

    /// Get a shelf entry by ID, scoped to the owning user.
    async fn get_shelf_entry(
        &self,
        entry_id: Uuid,
        user_id: &str,
    ) -> MetadataResult<Option<ShelfEntryRow>>;

    /// Get a user's shelf entry for a book, if any.
    async fn get_shelf_entry_for_book(
        &self,
        user_id: &str,
        book_id: Uuid,
    ) -> MetadataResult<Option<ShelfEntryRow>>;

    /// Move an entry to a different shelf, resetting `date_added`.
    async fn update_shelf_type(
        &self,
        entry_id: Uuid,
        user_id: &str,
        shelf_type: &str,
        date_added: OffsetDateTime,
    ) -> MetadataResult<()>;

    /// Set or clear the review link on an entry.
    async fn set_entry_review(
        &self,
        entry_id: Uuid,
        user_id: &str,
        review_id: Option<Uuid>,
    ) -> MetadataResult<()>;

    /// Delete a shelf entry.
    async fn delete_shelf_entry(&self, entry_id: Uuid, user_id: &str) -> MetadataResult<()>;

    /// List a user's shelf entries with their books and reviews, newest
    /// additions first.
    async fn list_shelf(&self, user_id: &str) -> MetadataResult<Vec<ShelfItem>>;
}
