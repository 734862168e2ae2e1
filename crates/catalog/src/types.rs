//! Wire types for the catalog volumes API.

use serde::Deserialize;
use shelfmark_core::CatalogBookDetails;

/// A single catalog volume as returned by the volumes API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVolume {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i64>,
    pub language: Option<String>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub preview_link: Option<String>,
    pub info_link: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<CatalogVolume>,
    #[serde(default)]
    pub total_items: i64,
}

impl CatalogVolume {
    /// Flatten the volume into the descriptive payload used for
    /// mirroring. ISBN-13 is preferred over ISBN-10 when both appear.
    pub fn details(&self) -> CatalogBookDetails {
        let info = &self.volume_info;
        let isbn = info
            .industry_identifiers
            .iter()
            .find(|i| i.kind == "ISBN_13")
            .or_else(|| {
                info.industry_identifiers
                    .iter()
                    .find(|i| i.kind == "ISBN_10")
            })
            .map(|i| i.identifier.clone());

        CatalogBookDetails {
            title: info.title.clone().unwrap_or_else(|| "Unknown".to_string()),
            authors: info.authors.clone(),
            description: info.description.clone(),
            cover_image_url: info
                .image_links
                .as_ref()
                .and_then(|l| l.thumbnail.clone()),
            small_thumbnail_url: info
                .image_links
                .as_ref()
                .and_then(|l| l.small_thumbnail.clone()),
            publisher: info.publisher.clone(),
            publication_date: info.published_date.clone(),
            page_count: info.page_count,
            language: info.language.clone(),
            avg_rating: info.average_rating,
            ratings_count: info.ratings_count,
            preview_link: info.preview_link.clone(),
            info_link: info.info_link.clone(),
            isbn,
            categories: info.categories.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_details_mapping() {
        let json = r#"{
            "id": "zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Fellowship of the Ring",
                "authors": ["J. R. R. Tolkien"],
                "publisher": "Houghton Mifflin",
                "publishedDate": "1954-07",
                "pageCount": 423,
                "language": "en",
                "averageRating": 4.5,
                "ratingsCount": 1234,
                "categories": ["Fiction / Fantasy /"],
                "imageLinks": {
                    "thumbnail": "http://example.com/t.jpg",
                    "smallThumbnail": "http://example.com/s.jpg"
                },
                "industryIdentifiers": [
                    {"type": "ISBN_10", "identifier": "0618002227"},
                    {"type": "ISBN_13", "identifier": "9780618002221"}
                ]
            }
        }"#;

        let volume: CatalogVolume = serde_json::from_str(json).unwrap();
        let details = volume.details();
        assert_eq!(details.title, "The Fellowship of the Ring");
        assert_eq!(details.authors, vec!["J. R. R. Tolkien"]);
        assert_eq!(details.isbn.as_deref(), Some("9780618002221"));
        assert_eq!(details.publication_date.as_deref(), Some("1954-07"));
        assert_eq!(details.cover_image_url.as_deref(), Some("http://example.com/t.jpg"));
        assert_eq!(details.page_count, Some(423));
    }

    #[test]
    fn test_volume_details_sparse() {
        let volume: CatalogVolume = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        let details = volume.details();
        assert_eq!(details.title, "Unknown");
        assert!(details.authors.is_empty());
        assert!(details.isbn.is_none());
    }
}
