//! Catalog storage abstraction.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::catalog::filter::{AlbumFilter, ArtistFilter, GenreFilter, Pagination, SongFilter};
use crate::catalog::models::{Album, Artist, Genre, Song};

/// Failures raised while querying the catalog.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("{0}")]
    Query(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to songs, albums, artists and genres.
///
/// Songs are always returned populated.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn songs(&self, filter: &SongFilter, page: Pagination) -> StoreResult<Vec<Song>>;

    async fn song(&self, id: ObjectId) -> StoreResult<Option<Song>>;

    /// One song drawn uniformly at random from those matching `filter`.
    async fn random_song(&self, filter: &SongFilter) -> StoreResult<Option<Song>>;

    async fn artists(&self, filter: &ArtistFilter, page: Pagination) -> StoreResult<Vec<Artist>>;

    async fn artist(&self, id: ObjectId) -> StoreResult<Option<Artist>>;

    async fn albums(&self, filter: &AlbumFilter, page: Pagination) -> StoreResult<Vec<Album>>;

    async fn album(&self, id: ObjectId) -> StoreResult<Option<Album>>;

    async fn genres(&self, filter: &GenreFilter, page: Pagination) -> StoreResult<Vec<Genre>>;

    async fn genre(&self, id: ObjectId) -> StoreResult<Option<Genre>>;
}
