//! Test fixtures.

use serde_json::{Value, json};

/// Catalog details payload for a well-known test book.
#[allow(dead_code)]
pub fn dune_details() -> Value {
    json!({
        "title": "Dune",
        "authors": ["Frank Herbert"],
        "description": "A desert planet and its spice.",
        "publisher": "Chilton Books",
        "publication_date": "1965-08",
        "page_count": 412,
        "language": "en",
        "categories": ["Fiction / Science Fiction /", "Fiction / Classics"]
    })
}

/// A second book, minimal details.
#[allow(dead_code)]
pub fn hobbit_details() -> Value {
    json!({
        "title": "The Hobbit",
        "authors": ["J. R. R. Tolkien"],
        "publication_date": "1937"
    })
}
