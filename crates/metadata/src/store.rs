//! Metadata store trait and the SQLite implementation.

use crate::error::MetadataResult;
use crate::repos::{BookRepo, GenreRepo, ProfileRepo, ReviewRepo, ShelfRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore:
    BookRepo + GenreRepo + ShelfRepo + ReviewRepo + ProfileRepo + Send + Sync
{
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store and run migrations.
    pub async fn new(path: impl AsRef<Path>, busy_timeout_secs: u64) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::error::MetadataError;
    use crate::models::*;
    use crate::repos::ShelfItem;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[async_trait]
    impl BookRepo for SqliteStore {
        async fn find_or_create_book(&self, book: &BookRow) -> MetadataResult<BookRow> {
            sqlx::query(
                "INSERT INTO books (id, catalog_id, title, authors, description, \
                 cover_image_url, small_thumbnail_url, publisher, publication_date, \
                 page_count, language, avg_rating, ratings_count, preview_link, \
                 info_link, isbn, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
                 ON CONFLICT(catalog_id) DO NOTHING",
            )
            .bind(book.id)
            .bind(&book.catalog_id)
            .bind(&book.title)
            .bind(&book.authors)
            .bind(&book.description)
            .bind(&book.cover_image_url)
            .bind(&book.small_thumbnail_url)
            .bind(&book.publisher)
            .bind(&book.publication_date)
            .bind(book.page_count)
            .bind(&book.language)
            .bind(book.avg_rating)
            .bind(book.ratings_count)
            .bind(&book.preview_link)
            .bind(&book.info_link)
            .bind(&book.isbn)
            .bind(book.created_at)
            .bind(book.updated_at)
            .execute(&self.pool)
            .await?;

            // Re-read regardless of insert outcome; a concurrent insert may
            // have won the race, and both callers must see the same row.
            self.get_book_by_catalog_id(&book.catalog_id)
                .await?
                .ok_or_else(|| {
                    MetadataError::Internal(format!(
                        "book for catalog_id '{}' missing after insert",
                        book.catalog_id
                    ))
                })
        }

        async fn get_book(&self, book_id: Uuid) -> MetadataResult<Option<BookRow>> {
            let row = sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE id = ?")
                .bind(book_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_book_by_catalog_id(&self, catalog_id: &str) -> MetadataResult<Option<BookRow>> {
            let row = sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE catalog_id = ?")
                .bind(catalog_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }
    }

    #[async_trait]
    impl GenreRepo for SqliteStore {
        async fn find_or_create_genre(&self, genre: &GenreRow) -> MetadataResult<GenreRow> {
            sqlx::query(
                "INSERT INTO genres (id, name, created_at) VALUES (?, ?, ?) \
                 ON CONFLICT(name) DO NOTHING",
            )
            .bind(genre.id)
            .bind(&genre.name)
            .bind(genre.created_at)
            .execute(&self.pool)
            .await?;

            let row = sqlx::query_as::<_, GenreRow>("SELECT * FROM genres WHERE name = ?")
                .bind(&genre.name)
                .fetch_optional(&self.pool)
                .await?;
            row.ok_or_else(|| {
                MetadataError::Internal(format!("genre '{}' missing after insert", genre.name))
            })
        }

        async fn link_book_genre(&self, book_id: Uuid, genre_id: Uuid) -> MetadataResult<()> {
            sqlx::query(
                "INSERT INTO books_genres (book_id, genre_id) VALUES (?, ?) \
                 ON CONFLICT(book_id, genre_id) DO NOTHING",
            )
            .bind(book_id)
            .bind(genre_id)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_book_genres(&self, book_id: Uuid) -> MetadataResult<Vec<GenreRow>> {
            let rows = sqlx::query_as::<_, GenreRow>(
                "SELECT g.id, g.name, g.created_at FROM genres g \
                 JOIN books_genres bg ON bg.genre_id = g.id \
                 WHERE bg.book_id = ? ORDER BY g.name",
            )
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl ShelfRepo for SqliteStore {
        async fn create_shelf_entry(&self, entry: &ShelfEntryRow) -> MetadataResult<ShelfEntryRow> {
            sqlx::query(
                "INSERT INTO bookshelves (id, user_id, book_id, shelf_type, date_added, \
                 date_started, date_finished, review_id) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
                 ON CONFLICT(user_id, book_id) DO NOTHING",
            )
            .bind(entry.id)
            .bind(&entry.user_id)
            .bind(entry.book_id)
            .bind(&entry.shelf_type)
            .bind(entry.date_added)
            .bind(entry.date_started)
            .bind(entry.date_finished)
            .bind(entry.review_id)
            .execute(&self.pool)
            .await?;

            self.get_shelf_entry_for_book(&entry.user_id, entry.book_id)
                .await?
                .ok_or_else(|| {
                    MetadataError::Internal(format!(
                        "shelf entry for book {} missing after insert",
                        entry.book_id
                    ))
                })
        }

        async fn get_shelf_entry(
            &self,
            entry_id: Uuid,
            user_id: &str,
        ) -> MetadataResult<Option<ShelfEntryRow>> {
            let row = sqlx::query_as::<_, ShelfEntryRow>(
                "SELECT * FROM bookshelves WHERE id = ? AND user_id = ?",
            )
            .bind(entry_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn get_shelf_entry_for_book(
            &self,
            user_id: &str,
            book_id: Uuid,
        ) -> MetadataResult<Option<ShelfEntryRow>> {
            let row = sqlx::query_as::<_, ShelfEntryRow>(
                "SELECT * FROM bookshelves WHERE user_id = ? AND book_id = ?",
            )
            .bind(user_id)
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn update_shelf_type(
            &self,
            entry_id: Uuid,
            user_id: &str,
            shelf_type: &str,
            date_added: OffsetDateTime,
        ) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE bookshelves SET shelf_type = ?, date_added = ? \
                 WHERE id = ? AND user_id = ?",
            )
            .bind(shelf_type)
            .bind(date_added)
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "shelf entry {entry_id} not found"
                )));
            }
            Ok(())
        }

        async fn set_entry_review(
            &self,
            entry_id: Uuid,
            user_id: &str,
            review_id: Option<Uuid>,
        ) -> MetadataResult<()> {
            let result =
                sqlx::query("UPDATE bookshelves SET review_id = ? WHERE id = ? AND user_id = ?")
                    .bind(review_id)
                    .bind(entry_id)
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "shelf entry {entry_id} not found"
                )));
            }
            Ok(())
        }

        async fn delete_shelf_entry(&self, entry_id: Uuid, user_id: &str) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM bookshelves WHERE id = ? AND user_id = ?")
                .bind(entry_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "shelf entry {entry_id} not found"
                )));
            }
            Ok(())
        }

        async fn list_shelf(&self, user_id: &str) -> MetadataResult<Vec<ShelfItem>> {
            let entries = sqlx::query_as::<_, ShelfEntryRow>(
                "SELECT * FROM bookshelves WHERE user_id = ? ORDER BY date_added DESC, id",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

            let mut items = Vec::with_capacity(entries.len());
            for entry in entries {
                let book = self.get_book(entry.book_id).await?.ok_or_else(|| {
                    MetadataError::Internal(format!(
                        "book {} missing for shelf entry {}",
                        entry.book_id, entry.id
                    ))
                })?;
                let review = match entry.review_id {
                    Some(review_id) => self.get_review(review_id, user_id).await?,
                    None => None,
                };
                items.push(ShelfItem {
                    entry,
                    book,
                    review,
                });
            }
            Ok(items)
        }
    }

    #[async_trait]
    impl ReviewRepo for SqliteStore {
        async fn create_review(&self, review: &ReviewRow) -> MetadataResult<()> {
            sqlx::query(
                "INSERT INTO reviews (id, user_id, book_id, rating, review_text, \
                 created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(review.id)
            .bind(&review.user_id)
            .bind(review.book_id)
            .bind(review.rating)
            .bind(&review.review_text)
            .bind(review.created_at)
            .bind(review.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_review(
            &self,
            review_id: Uuid,
            user_id: &str,
        ) -> MetadataResult<Option<ReviewRow>> {
            let row = sqlx::query_as::<_, ReviewRow>(
                "SELECT * FROM reviews WHERE id = ? AND user_id = ?",
            )
            .bind(review_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn update_review(
            &self,
            review_id: Uuid,
            user_id: &str,
            rating: Option<i64>,
            review_text: Option<&str>,
            updated_at: OffsetDateTime,
        ) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE reviews SET rating = ?, review_text = ?, updated_at = ? \
                 WHERE id = ? AND user_id = ?",
            )
            .bind(rating)
            .bind(review_text)
            .bind(updated_at)
            .bind(review_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "review {review_id} not found"
                )));
            }
            Ok(())
        }

        async fn delete_review(&self, review_id: Uuid, user_id: &str) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM reviews WHERE id = ? AND user_id = ?")
                .bind(review_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "review {review_id} not found"
                )));
            }
            Ok(())
        }

        async fn list_book_reviews(&self, book_id: Uuid) -> MetadataResult<Vec<BookReviewRow>> {
            let rows = sqlx::query_as::<_, BookReviewRow>(
                "SELECT r.id, r.user_id, r.rating, r.review_text, r.created_at, \
                 r.updated_at, p.display_name \
                 FROM reviews r \
                 LEFT JOIN profiles p ON p.user_id = r.user_id \
                 WHERE r.book_id = ? AND r.review_text IS NOT NULL \
                 ORDER BY r.created_at DESC, r.id",
            )
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl ProfileRepo for SqliteStore {
        async fn upsert_profile(&self, profile: &ProfileRow) -> MetadataResult<()> {
            // created_at survives re-upserts; only the name and updated_at move
            sqlx::query(
                "INSERT INTO profiles (user_id, display_name, created_at, updated_at) \
                 VALUES (?, ?, ?, ?) \
                 ON CONFLICT(user_id) DO UPDATE SET \
                 display_name = excluded.display_name, updated_at = excluded.updated_at",
            )
            .bind(&profile.user_id)
            .bind(&profile.display_name)
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_profile(&self, user_id: &str) -> MetadataResult<Option<ProfileRow>> {
            let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Mirrored catalog books. One row per catalog volume.
CREATE TABLE IF NOT EXISTS books (
    id BLOB PRIMARY KEY,
    catalog_id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    authors TEXT,
    description TEXT,
    cover_image_url TEXT,
    small_thumbnail_url TEXT,
    publisher TEXT,
    publication_date TEXT,
    page_count INTEGER,
    language TEXT,
    avg_rating REAL,
    ratings_count INTEGER,
    preview_link TEXT,
    info_link TEXT,
    isbn TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_books_catalog ON books(catalog_id);

-- Genres. Names are unique, case-sensitively.
CREATE TABLE IF NOT EXISTS genres (
    id BLOB PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books_genres (
    book_id BLOB NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    genre_id BLOB NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, genre_id)
);

-- Per-user shelf entries. At most one entry per (user, book).
CREATE TABLE IF NOT EXISTS bookshelves (
    id BLOB PRIMARY KEY,
    user_id TEXT NOT NULL,
    book_id BLOB NOT NULL REFERENCES books(id),
    shelf_type TEXT NOT NULL,
    date_added TEXT NOT NULL,
    date_started TEXT,
    date_finished TEXT,
    review_id BLOB
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_bookshelves_user_book ON bookshelves(user_id, book_id);
CREATE INDEX IF NOT EXISTS idx_bookshelves_user ON bookshelves(user_id);

-- Reviews. Shelf entries link to these via review_id.
CREATE TABLE IF NOT EXISTS reviews (
    id BLOB PRIMARY KEY,
    user_id TEXT NOT NULL,
    book_id BLOB NOT NULL REFERENCES books(id),
    rating INTEGER,
    review_text TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reviews_book ON reviews(book_id);
CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id);

-- User profiles. Display names feed the public review listing.
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    display_name TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
