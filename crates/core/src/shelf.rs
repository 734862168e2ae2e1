//! Shelf types and shelf change requests.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three stored shelves a book can sit on for a given user.
///
/// Removal is not a stored state; removing a book deletes its shelf entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfType {
    WantToRead,
    CurrentlyReading,
    Read,
}

impl ShelfType {
    /// Stable string form used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WantToRead => "want_to_read",
            Self::CurrentlyReading => "currently_reading",
            Self::Read => "read",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "want_to_read" => Ok(Self::WantToRead),
            "currently_reading" => Ok(Self::CurrentlyReading),
            "read" => Ok(Self::Read),
            other => Err(Error::InvalidShelfType(other.to_string())),
        }
    }
}

impl fmt::Display for ShelfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A requested change to a user's shelf membership: move the book onto a
/// shelf, or remove it from all shelves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfChange {
    Move(ShelfType),
    Remove,
}

impl ShelfChange {
    /// Parse the wire form: a shelf type string, or the pseudo-type
    /// `"removed"`.
    pub fn parse(s: &str) -> Result<Self> {
        if s == "removed" {
            Ok(Self::Remove)
        } else {
            ShelfType::parse(s).map(Self::Move)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_type_round_trip() {
        for shelf in [
            ShelfType::WantToRead,
            ShelfType::CurrentlyReading,
            ShelfType::Read,
        ] {
            assert_eq!(ShelfType::parse(shelf.as_str()).unwrap(), shelf);
        }
    }

    #[test]
    fn test_shelf_change_removed_pseudo_type() {
        assert_eq!(ShelfChange::parse("removed").unwrap(), ShelfChange::Remove);
        assert_eq!(
            ShelfChange::parse("read").unwrap(),
            ShelfChange::Move(ShelfType::Read)
        );
        assert!(ShelfChange::parse("to-read").is_err());
        assert!(ShelfChange::parse("").is_err());
    }
}
