//! Review repository.

use crate::error::MetadataResult;
use crate::models::{BookReviewRow, ReviewRow};
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

/// Repository for reviews.
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    /// Insert a new review.
    async fn create_review(&self, review: &ReviewRow) -> MetadataResult<()>;

    /// Get a review by ID, scoped to the owning user.
    async fn get_review(&self, review_id: Uuid, user_id: &str)
        -> MetadataResult<Option<ReviewRow>>;

    /// Overwrite a review's rating and text. `created_at` is preserved.
    async fn update_review(
        &self,
        review_id: Uuid,
        user_id: &str,
        rating: Option<i64>,
        review_text: Option<&str>,
        updated_at: OffsetDateTime,
    ) -> MetadataResult<()>;

    /// Delete a review.
    async fn delete_review(&self, review_id: Uuid, user_id: &str) -> MetadataResult<()>;

    /// List reviews with text for a book, joined with author profiles,
    /// newest first. Rating-only reviews are excluded.
    async fn list_book_reviews(&self, book_id: Uuid) -> MetadataResult<Vec<BookReviewRow>>;
}
