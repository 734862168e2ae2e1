//! Store-level tests for the SQLite metadata implementation.

mod common;

use shelfmark_metadata::models::{BookRow, GenreRow, ProfileRow, ReviewRow, ShelfEntryRow};
use shelfmark_metadata::{MetadataError, MetadataStore, SqliteStore};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

async fn new_store() -> (tempfile::TempDir, Arc<dyn MetadataStore>) {
    let temp = tempfile::tempdir().unwrap();
    let store = SqliteStore::new(temp.path().join("metadata.db"), 5)
        .await
        .unwrap();
    (temp, Arc::new(store))
}

fn book_row(catalog_id: &str, title: &str) -> BookRow {
    let now = OffsetDateTime::now_utc();
    BookRow {
        id: Uuid::new_v4(),
        catalog_id: catalog_id.to_string(),
        title: title.to_string(),
        authors: Some(r#"["Frank Herbert"]"#.to_string()),
        description: None,
        cover_image_url: None,
        small_thumbnail_url: None,
        publisher: None,
        publication_date: Some("1965-08-01".to_string()),
        page_count: Some(412),
        language: Some("en".to_string()),
        avg_rating: None,
        ratings_count: None,
        preview_link: None,
        info_link: None,
        isbn: None,
        created_at: now,
        updated_at: now,
    }
}

fn shelf_entry(user_id: &str, book_id: Uuid, shelf_type: &str) -> ShelfEntryRow {
    ShelfEntryRow {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        book_id,
        shelf_type: shelf_type.to_string(),
        date_added: OffsetDateTime::now_utc(),
        date_started: None,
        date_finished: None,
        review_id: None,
    }
}

#[tokio::test]
async fn test_find_or_create_book_returns_existing() {
    let (_temp, store) = new_store().await;

    let first = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();
    let second = store
        .find_or_create_book(&book_row("dune", "Dune (different title)"))
        .await
        .unwrap();

    // Second insert loses; the stored row is untouched
    assert_eq!(first.id, second.id);
    assert_eq!(second.title, "Dune");
}

#[tokio::test]
async fn test_concurrent_find_or_create_book_converges() {
    let (_temp, store) = new_store().await;

    let row_a = book_row("dune", "Dune");
    let row_b = book_row("dune", "Dune");
    let (a, b) = tokio::join!(
        store.find_or_create_book(&row_a),
        store.find_or_create_book(&row_b)
    );
    assert_eq!(a.unwrap().id, b.unwrap().id);
}

#[tokio::test]
async fn test_shelf_entry_unique_per_user_book() {
    let (_temp, store) = new_store().await;
    let book = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();

    let first = store
        .create_shelf_entry(&shelf_entry("alice", book.id, "read"))
        .await
        .unwrap();
    let second = store
        .create_shelf_entry(&shelf_entry("alice", book.id, "want_to_read"))
        .await
        .unwrap();

    // The duplicate insert is dropped; the original entry wins
    assert_eq!(first.id, second.id);
    assert_eq!(second.shelf_type, "read");

    // A different user gets their own entry
    let other = store
        .create_shelf_entry(&shelf_entry("bob", book.id, "read"))
        .await
        .unwrap();
    assert_ne!(other.id, first.id);
}

#[tokio::test]
async fn test_scoped_writes_reject_other_users() {
    let (_temp, store) = new_store().await;
    let book = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();
    let entry = store
        .create_shelf_entry(&shelf_entry("alice", book.id, "read"))
        .await
        .unwrap();

    let err = store
        .update_shelf_type(entry.id, "bob", "want_to_read", OffsetDateTime::now_utc())
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::NotFound(_)));

    let err = store.delete_shelf_entry(entry.id, "bob").await.unwrap_err();
    assert!(matches!(err, MetadataError::NotFound(_)));

    // The entry is untouched
    let row = store.get_shelf_entry(entry.id, "alice").await.unwrap().unwrap();
    assert_eq!(row.shelf_type, "read");
}

#[tokio::test]
async fn test_update_shelf_type_resets_date_added() {
    let (_temp, store) = new_store().await;
    let book = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();
    let entry = store
        .create_shelf_entry(&shelf_entry("alice", book.id, "want_to_read"))
        .await
        .unwrap();

    let later = entry.date_added + time::Duration::hours(1);
    store
        .update_shelf_type(entry.id, "alice", "read", later)
        .await
        .unwrap();

    let row = store.get_shelf_entry(entry.id, "alice").await.unwrap().unwrap();
    assert_eq!(row.shelf_type, "read");
    assert!(row.date_added > entry.date_added);
}

#[tokio::test]
async fn test_genre_find_or_create_and_link_idempotent() {
    let (_temp, store) = new_store().await;
    let book = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();

    let now = OffsetDateTime::now_utc();
    let genre = GenreRow {
        id: Uuid::new_v4(),
        name: "Science Fiction".to_string(),
        created_at: now,
    };
    let first = store.find_or_create_genre(&genre).await.unwrap();
    let second = store
        .find_or_create_genre(&GenreRow {
            id: Uuid::new_v4(),
            name: "Science Fiction".to_string(),
            created_at: now,
        })
        .await
        .unwrap();
    assert_eq!(first.id, second.id);

    // Case-sensitive names are distinct
    let lower = store
        .find_or_create_genre(&GenreRow {
            id: Uuid::new_v4(),
            name: "science fiction".to_string(),
            created_at: now,
        })
        .await
        .unwrap();
    assert_ne!(lower.id, first.id);

    store.link_book_genre(book.id, first.id).await.unwrap();
    store.link_book_genre(book.id, first.id).await.unwrap();
    let genres = store.get_book_genres(book.id).await.unwrap();
    assert_eq!(genres.len(), 1);
}

#[tokio::test]
async fn test_list_book_reviews_excludes_rating_only() {
    let (_temp, store) = new_store().await;
    let book = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();

    let base = OffsetDateTime::now_utc();
    let with_text = ReviewRow {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        book_id: book.id,
        rating: Some(5),
        review_text: Some("Great.".to_string()),
        created_at: base,
        updated_at: base,
    };
    let rating_only = ReviewRow {
        id: Uuid::new_v4(),
        user_id: "bob".to_string(),
        book_id: book.id,
        rating: Some(3),
        review_text: None,
        created_at: base + time::Duration::minutes(1),
        updated_at: base + time::Duration::minutes(1),
    };
    let newer = ReviewRow {
        id: Uuid::new_v4(),
        user_id: "carol".to_string(),
        book_id: book.id,
        rating: None,
        review_text: Some("Dense but rewarding.".to_string()),
        created_at: base + time::Duration::minutes(2),
        updated_at: base + time::Duration::minutes(2),
    };
    store.create_review(&with_text).await.unwrap();
    store.create_review(&rating_only).await.unwrap();
    store.create_review(&newer).await.unwrap();

    store
        .upsert_profile(&ProfileRow {
            user_id: "alice".to_string(),
            display_name: Some("Alice L.".to_string()),
            created_at: base,
            updated_at: base,
        })
        .await
        .unwrap();

    let rows = store.list_book_reviews(book.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    // Newest first
    assert_eq!(rows[0].user_id, "carol");
    assert!(rows[0].display_name.is_none());
    assert_eq!(rows[1].user_id, "alice");
    assert_eq!(rows[1].display_name.as_deref(), Some("Alice L."));
}

#[tokio::test]
async fn test_review_scoped_update_and_delete() {
    let (_temp, store) = new_store().await;
    let book = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();

    let now = OffsetDateTime::now_utc();
    let review = ReviewRow {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        book_id: book.id,
        rating: Some(4),
        review_text: Some("Good.".to_string()),
        created_at: now,
        updated_at: now,
    };
    store.create_review(&review).await.unwrap();

    let err = store
        .update_review(review.id, "bob", Some(1), Some("Bad."), now)
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::NotFound(_)));

    store
        .update_review(review.id, "alice", Some(5), Some("Better."), now)
        .await
        .unwrap();
    let row = store.get_review(review.id, "alice").await.unwrap().unwrap();
    assert_eq!(row.rating, Some(5));
    assert_eq!(row.review_text.as_deref(), Some("Better."));

    store.delete_review(review.id, "alice").await.unwrap();
    assert!(store.get_review(review.id, "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_entry_review_and_list_shelf() {
    let (_temp, store) = new_store().await;
    let dune = store.find_or_create_book(&book_row("dune", "Dune")).await.unwrap();
    let hobbit = store
        .find_or_create_book(&book_row("hobbit", "The Hobbit"))
        .await
        .unwrap();

    let first = store
        .create_shelf_entry(&shelf_entry("alice", dune.id, "read"))
        .await
        .unwrap();
    // Second entry added later sorts first
    let mut later = shelf_entry("alice", hobbit.id, "want_to_read");
    later.date_added = first.date_added + time::Duration::minutes(1);
    store.create_shelf_entry(&later).await.unwrap();

    let now = OffsetDateTime::now_utc();
    let review = ReviewRow {
        id: Uuid::new_v4(),
        user_id: "alice".to_string(),
        book_id: dune.id,
        rating: Some(5),
        review_text: None,
        created_at: now,
        updated_at: now,
    };
    store.create_review(&review).await.unwrap();
    store
        .set_entry_review(first.id, "alice", Some(review.id))
        .await
        .unwrap();

    let items = store.list_shelf("alice").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].book.title, "The Hobbit");
    assert!(items[0].review.is_none());
    assert_eq!(items[1].book.title, "Dune");
    assert_eq!(items[1].review.as_ref().unwrap().rating, Some(5));

    // Clearing the link drops the review from the listing
    store.set_entry_review(first.id, "alice", None).await.unwrap();
    let items = store.list_shelf("alice").await.unwrap();
    assert!(items[1].review.is_none());
}

#[tokio::test]
async fn test_profile_upsert_overwrites() {
    let (_temp, store) = new_store().await;

    let now = OffsetDateTime::now_utc();
    store
        .upsert_profile(&ProfileRow {
            user_id: "alice".to_string(),
            display_name: Some("Alice".to_string()),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
    store
        .upsert_profile(&ProfileRow {
            user_id: "alice".to_string(),
            display_name: Some("Alice L.".to_string()),
            created_at: now + time::Duration::hours(1),
            updated_at: now + time::Duration::hours(1),
        })
        .await
        .unwrap();

    let profile = store.get_profile("alice").await.unwrap().unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Alice L."));
    // The original created_at survives the overwrite
    assert_eq!(profile.created_at, now);
    assert!(store.get_profile("bob").await.unwrap().is_none());
}
