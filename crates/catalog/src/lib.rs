//! External catalog client for Shelfmark.
//!
//! Wraps the upstream volumes API: volume lookup by id and paged search.
//! Responses are flattened into the descriptive payload the mirror
//! persists; the catalog's own record shapes stay inside this crate.

pub mod client;
pub mod error;
pub mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, CatalogResult};
pub use types::{CatalogVolume, SearchPage};
