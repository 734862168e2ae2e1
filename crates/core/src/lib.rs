//! Core domain types and shared logic for Shelfmark.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Book references (local vs. external catalog) and catalog payloads
//! - Publication date and genre name normalization
//! - Shelf types and shelf change requests
//! - Ratings and the review content rule
//! - Application configuration

pub mod book;
pub mod config;
pub mod error;
pub mod review;
pub mod shelf;

pub use book::{BookRef, CatalogBookDetails, normalize_genre_name, normalize_publication_date};
pub use error::{Error, Result};
pub use review::{Rating, review_has_content};
pub use shelf::{ShelfChange, ShelfType};

/// Maximum accepted length for free-text reviews, in bytes.
pub const MAX_REVIEW_TEXT_LEN: usize = 20_000;

/// Maximum number of categories mirrored per book.
pub const MAX_GENRES_PER_BOOK: usize = 32;
