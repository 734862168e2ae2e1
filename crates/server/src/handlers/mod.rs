//! HTTP request handlers.

pub mod books;
pub mod catalog;
pub mod common;
pub mod reviews;
pub mod shelves;

pub use books::*;
pub use catalog::*;
pub use common::*;
pub use reviews::*;
pub use shelves::*;
