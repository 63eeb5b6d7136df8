//! Catalog query subsystem.
//!
//! # Data Flow
//! ```text
//! query string
//!     → filter.rs (typed filter + pagination)
//!     → store.rs (CatalogStore trait)
//!     → mongo.rs (resolve references, query, populate)
//!     → models.rs (documents serialized back as JSON)
//! ```
//!
//! # Design Decisions
//! - Handlers only see the trait, so tests can swap in an in-memory store
//! - Filters are plain data; building BSON from them is pure and testable

pub mod filter;
pub mod models;
pub mod mongo;
pub mod store;

pub use filter::{AlbumFilter, ArtistFilter, GenreFilter, Pagination, SongFilter};
pub use models::{Album, Artist, Genre, Song, SongRecord};
pub use mongo::MongoCatalog;
pub use store::{CatalogStore, StoreError, StoreResult};
