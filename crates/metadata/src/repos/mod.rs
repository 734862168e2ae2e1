//! Repository traits for metadata operations.

pub mod books;
pub mod genres;
pub mod profiles;
pub mod reviews;
pub mod shelves;

pub use books::BookRepo;
pub use genres::GenreRepo;
pub use profiles::ProfileRepo;
pub use reviews::ReviewRepo;
pub use shelves::{ShelfItem, ShelfRepo};
