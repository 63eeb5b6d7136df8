//! Catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};

use crate::catalog::{
    Album, AlbumFilter, Artist, ArtistFilter, Genre, GenreFilter, Pagination, Song, SongFilter,
};
use crate::http::request::CatalogQuery;
use crate::http::response::ApiError;
use crate::http::server::AppState;

fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

pub async fn status() -> Json<Value> {
    Json(json!({ "status": "working" }))
}

pub async fn list_songs(
    State(state): State<AppState>,
    CatalogQuery(filter): CatalogQuery<SongFilter>,
    CatalogQuery(page): CatalogQuery<Pagination>,
) -> Result<Json<Vec<Song>>, ApiError> {
    Ok(Json(state.catalog.songs(&filter, page).await?))
}

pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Song>, ApiError> {
    let id = parse_id(&id)?;
    state
        .catalog
        .song(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Song not found"))
}

pub async fn random_song(
    State(state): State<AppState>,
    CatalogQuery(filter): CatalogQuery<SongFilter>,
) -> Result<Json<Song>, ApiError> {
    state
        .catalog
        .random_song(&filter)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("No songs found matching the criteria"))
}

pub async fn list_artists(
    State(state): State<AppState>,
    CatalogQuery(filter): CatalogQuery<ArtistFilter>,
    CatalogQuery(page): CatalogQuery<Pagination>,
) -> Result<Json<Vec<Artist>>, ApiError> {
    Ok(Json(state.catalog.artists(&filter, page).await?))
}

pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artist>, ApiError> {
    let id = parse_id(&id)?;
    state
        .catalog
        .artist(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Artist not found"))
}

pub async fn list_albums(
    State(state): State<AppState>,
    CatalogQuery(filter): CatalogQuery<AlbumFilter>,
    CatalogQuery(page): CatalogQuery<Pagination>,
) -> Result<Json<Vec<Album>>, ApiError> {
    Ok(Json(state.catalog.albums(&filter, page).await?))
}

pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Album>, ApiError> {
    let id = parse_id(&id)?;
    state
        .catalog
        .album(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Album not found"))
}

pub async fn list_genres(
    State(state): State<AppState>,
    CatalogQuery(filter): CatalogQuery<GenreFilter>,
    CatalogQuery(page): CatalogQuery<Pagination>,
) -> Result<Json<Vec<Genre>>, ApiError> {
    Ok(Json(state.catalog.genres(&filter, page).await?))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Genre>, ApiError> {
    let id = parse_id(&id)?;
    state
        .catalog
        .genre(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Genre not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert!(parse_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
        assert!(matches!(parse_id("not-an-id"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("65a1f0c2e4b0a1b2c3d4e5f"), Err(ApiError::InvalidId)));
    }
}
