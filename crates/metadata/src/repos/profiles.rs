//! User profile repository.

use crate::error::MetadataResult;
use crate::models::ProfileRow;
use async_trait::async_trait;

/// Repository for user profiles.
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    /// Insert or update a profile's display name.
    async fn upsert_profile(&self, profile: &ProfileRow) -> MetadataResult<()>;

    /// Get a profile by user ID.
    async fn get_profile(&self, user_id: &str) -> MetadataResult<Option<ProfileRow>>;
}
