//! Ratings and the review content rule.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A star rating attached to a review. Valid range is 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(i64);

impl Rating {
    /// Validate and wrap a raw rating value.
    pub fn new(rating: i64) -> Result<Self> {
        if (1..=5).contains(&rating) {
            Ok(Self(rating))
        } else {
            Err(Error::InvalidRating { rating })
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

/// The content rule: a review exists only while it carries a rating or
/// non-blank text. Writing empty content deletes the review instead of
/// persisting an empty row.
pub fn review_has_content(rating: Option<Rating>, text: Option<&str>) -> bool {
    rating.is_some() || text.is_some_and(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
        for r in 1..=5 {
            assert_eq!(Rating::new(r).unwrap().get(), r);
        }
    }

    #[test]
    fn test_content_rule() {
        assert!(review_has_content(Some(Rating::new(4).unwrap()), None));
        assert!(review_has_content(None, Some("Loved it")));
        assert!(!review_has_content(None, Some("   ")));
        assert!(!review_has_content(None, Some("")));
        assert!(!review_has_content(None, None));
    }
}
