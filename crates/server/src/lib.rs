//! HTTP API server for Shelfmark.
//!
//! This crate provides the HTTP control plane:
//! - Catalog mirroring (first-sight materialization of catalog volumes)
//! - Shelf management
//! - The review ledger and public review listing
//! - Catalog search and volume proxying

pub mod auth;
pub mod error;
pub mod handlers;
pub mod mirror;
pub mod routes;
pub mod state;

pub use auth::{Session, TraceId};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
