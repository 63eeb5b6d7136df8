//! MongoDB-backed catalog.
//!
//! # Responsibilities
//! - Connect once at startup and verify the deployment answers
//! - Resolve song reference filters into id sets
//! - Populate songs with their album, genre and artists
//!
//! # Design Decisions
//! - Population is done with one `$in` lookup per referenced collection,
//!   batched over every song in the page
//! - Random sampling is delegated to the `$sample` aggregation stage

use std::collections::HashSet;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;

use crate::catalog::filter::{
    AlbumFilter, ArtistFilter, GenreFilter, Pagination, ResolvedRefs, SongFilter,
};
use crate::catalog::models::{Album, Artist, Genre, References, Song, SongRecord};
use crate::catalog::store::{CatalogStore, StoreResult};
use crate::config::StoreConfig;

const SONGS: &str = "songs";
const ALBUMS: &str = "albums";
const ARTISTS: &str = "artists";
const GENRES: &str = "genres";

#[derive(Debug, Clone)]
pub struct MongoCatalog {
    db: Database,
}

impl MongoCatalog {
    /// Connect and ping. Fails if the deployment cannot be reached.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        if let Some(max) = config.max_pool_size {
            options.max_pool_size = Some(max);
        }

        let client = Client::with_options(options)?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.database));

        db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = %db.name(), "Connected to MongoDB");

        Ok(Self { db })
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    async fn list<T>(&self, name: &str, filter: Document, page: Pagination) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        let cursor = self
            .collection::<T>(name)
            .find(filter)
            .skip(u64::from(page.offset))
            .limit(i64::from(page.limit))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn by_id<T>(&self, name: &str, id: ObjectId) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        Ok(self.collection::<T>(name).find_one(doc! { "_id": id }).await?)
    }

    async fn ids_matching(&self, name: &str, filter: Document) -> StoreResult<Vec<ObjectId>> {
        let docs: Vec<Document> = self
            .collection::<Document>(name)
            .find(filter)
            .projection(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_object_id("_id").ok())
            .collect())
    }

    async fn any_in<T>(&self, name: &str, ids: HashSet<ObjectId>) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<ObjectId> = ids.into_iter().collect();
        let cursor = self
            .collection::<T>(name)
            .find(doc! { "_id": { "$in": ids } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn song_predicate(&self, filter: &SongFilter) -> StoreResult<Document> {
        let mut refs = ResolvedRefs::default();
        if let Some(lookup) = filter.album_lookup() {
            refs.albums = Some(self.ids_matching(ALBUMS, lookup).await?);
        }
        if let Some(lookup) = filter.genre_lookup() {
            refs.genres = Some(self.ids_matching(GENRES, lookup).await?);
        }
        if let Some(lookup) = filter.artist_lookup() {
            refs.artists = Some(self.ids_matching(ARTISTS, lookup).await?);
        }
        Ok(filter.to_document(&refs))
    }

    async fn populate(&self, records: Vec<SongRecord>) -> StoreResult<Vec<Song>> {
        let album_ids = records.iter().map(|s| s.album).collect();
        let genre_ids = records.iter().map(|s| s.genre).collect();
        let artist_ids = records.iter().flat_map(|s| s.artists.iter().copied()).collect();

        let refs = References::new(
            self.any_in(ALBUMS, album_ids).await?,
            self.any_in(GENRES, genre_ids).await?,
            self.any_in(ARTISTS, artist_ids).await?,
        );

        Ok(records.into_iter().map(|record| record.populate(&refs)).collect())
    }
}

#[async_trait]
impl CatalogStore for MongoCatalog {
    async fn songs(&self, filter: &SongFilter, page: Pagination) -> StoreResult<Vec<Song>> {
        let predicate = self.song_predicate(filter).await?;
        let records = self.list::<SongRecord>(SONGS, predicate, page).await?;
        self.populate(records).await
    }

    async fn song(&self, id: ObjectId) -> StoreResult<Option<Song>> {
        match self.by_id::<SongRecord>(SONGS, id).await? {
            Some(record) => Ok(self.populate(vec![record]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn random_song(&self, filter: &SongFilter) -> StoreResult<Option<Song>> {
        let predicate = self.song_predicate(filter).await?;
        let mut cursor = self
            .collection::<Document>(SONGS)
            .aggregate([
                doc! { "$match": predicate },
                doc! { "$sample": { "size": 1 } },
            ])
            .await?;

        match cursor.try_next().await? {
            Some(sampled) => {
                let record: SongRecord = bson::from_document(sampled)?;
                Ok(self.populate(vec![record]).await?.pop())
            }
            None => Ok(None),
        }
    }

    async fn artists(&self, filter: &ArtistFilter, page: Pagination) -> StoreResult<Vec<Artist>> {
        self.list(ARTISTS, filter.to_document(), page).await
    }

    async fn artist(&self, id: ObjectId) -> StoreResult<Option<Artist>> {
        self.by_id(ARTISTS, id).await
    }

    async fn albums(&self, filter: &AlbumFilter, page: Pagination) -> StoreResult<Vec<Album>> {
        self.list(ALBUMS, filter.to_document(), page).await
    }

    async fn album(&self, id: ObjectId) -> StoreResult<Option<Album>> {
        self.by_id(ALBUMS, id).await
    }

    async fn genres(&self, filter: &GenreFilter, page: Pagination) -> StoreResult<Vec<Genre>> {
        self.list(GENRES, filter.to_document(), page).await
    }

    async fn genre(&self, id: ObjectId) -> StoreResult<Option<Genre>> {
        self.by_id(GENRES, id).await
    }
}
