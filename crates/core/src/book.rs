//! Book identifiers and catalog payloads.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to a book, discriminating between a locally mirrored record
/// and an external catalog volume.
///
/// Callers must state which kind of identifier they hold; the core never
/// infers the kind from the shape of a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookRef {
    /// Locally mirrored book, identified by its internal id.
    Local(Uuid),
    /// External catalog volume, identified by the catalog's opaque id.
    Catalog(String),
}

impl BookRef {
    /// Parse a catalog reference, rejecting empty or oversized ids.
    pub fn catalog(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidBookRef("empty catalog id".to_string()));
        }
        if id.len() > 128 {
            return Err(Error::InvalidBookRef(format!(
                "catalog id too long: {} bytes",
                id.len()
            )));
        }
        Ok(Self::Catalog(id.to_string()))
    }
}

/// Descriptive payload for a catalog volume, as supplied by the caller at
/// mirroring time. Fields map one-to-one onto the mirrored book record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBookDetails {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub small_thumbnail_url: Option<String>,
    pub publisher: Option<String>,
    /// Raw publication date as reported by the catalog; normalized with
    /// [`normalize_publication_date`] before persisting.
    pub publication_date: Option<String>,
    pub page_count: Option<i64>,
    pub language: Option<String>,
    pub avg_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub preview_link: Option<String>,
    pub info_link: Option<String>,
    pub isbn: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Normalize a catalog publication date to ISO `YYYY-MM-DD`.
///
/// The catalog reports dates at varying precision: bare years, year-month,
/// or full dates. Partial dates are padded to the first day; anything else
/// (including prose like "March 2004") is dropped rather than rejected.
pub fn normalize_publication_date(raw: &str) -> Option<String> {
    fn digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [y] if y.len() == 4 && digits(y) => Some(format!("{y}-01-01")),
        [y, m] if y.len() == 4 && m.len() == 2 && digits(y) && digits(m) => {
            Some(format!("{y}-{m}-01"))
        }
        [y, m, d]
            if y.len() == 4
                && m.len() == 2
                && d.len() == 2
                && digits(y)
                && digits(m)
                && digits(d) =>
        {
            Some(raw.to_string())
        }
        _ => None,
    }
}

/// Normalize a catalog category into a genre name: trimmed, trailing
/// slashes stripped. Returns `None` for names that normalize to empty.
/// Comparison is case-sensitive; "Fiction" and "fiction" are distinct.
pub fn normalize_genre_name(raw: &str) -> Option<String> {
    let name = raw.trim().trim_end_matches('/').trim_end();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_year_only() {
        assert_eq!(
            normalize_publication_date("2004"),
            Some("2004-01-01".to_string())
        );
    }

    #[test]
    fn test_normalize_date_year_month() {
        assert_eq!(
            normalize_publication_date("2004-03"),
            Some("2004-03-01".to_string())
        );
    }

    #[test]
    fn test_normalize_date_full() {
        assert_eq!(
            normalize_publication_date("2004-03-15"),
            Some("2004-03-15".to_string())
        );
    }

    #[test]
    fn test_normalize_date_prose_dropped() {
        assert_eq!(normalize_publication_date("March 2004"), None);
        assert_eq!(normalize_publication_date("2004?"), None);
        assert_eq!(normalize_publication_date(""), None);
        assert_eq!(normalize_publication_date("20-04"), None);
    }

    #[test]
    fn test_normalize_genre_trailing_slashes() {
        assert_eq!(
            normalize_genre_name("Fiction / Thrillers //"),
            Some("Fiction / Thrillers".to_string())
        );
        assert_eq!(normalize_genre_name("  Science  "), Some("Science".to_string()));
        assert_eq!(normalize_genre_name("///"), None);
        assert_eq!(normalize_genre_name("   "), None);
    }

    #[test]
    fn test_book_ref_serde_tagged() {
        let local = BookRef::Local(Uuid::nil());
        let json = serde_json::to_string(&local).unwrap();
        assert_eq!(json, r#"{"local":"00000000-0000-0000-0000-000000000000"}"#);

        let catalog: BookRef = serde_json::from_str(r#"{"catalog":"zyTCAlFPjgYC"}"#).unwrap();
        assert_eq!(catalog, BookRef::Catalog("zyTCAlFPjgYC".to_string()));
    }

    #[test]
    fn test_catalog_ref_validation() {
        assert!(BookRef::catalog("  ").is_err());
        assert!(BookRef::catalog(&"x".repeat(200)).is_err());
        assert_eq!(
            BookRef::catalog(" abc ").unwrap(),
            BookRef::Catalog("abc".to_string())
        );
    }
}
