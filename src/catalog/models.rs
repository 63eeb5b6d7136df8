//! Catalog documents.
//!
//! Field names follow the stored documents, so the same types decode from
//! MongoDB and encode the JSON responses. Identifiers are written out as hex
//! strings under `_id`.

use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn hex_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

/// Album years were written by a JavaScript client and may be stored as
/// int32, int64 or double.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(value) => i32::try_from(value).map_err(D::Error::custom),
        Number::Float(value) if value.fract() == 0.0 => Ok(value as i32),
        Number::Float(value) => Err(D::Error::custom(format!("{value} is not a whole number"))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(rename = "_id", serialize_with = "hex_id")]
    pub id: ObjectId,
    pub code: String,
    pub title: String,
    #[serde(deserialize_with = "whole_number")]
    pub year: i32,
    #[serde(rename = "thumbnail300x300", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_300x300: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(rename = "_id", serialize_with = "hex_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(rename = "artists_thumbnail300x300", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_300x300: Option<String>,
    #[serde(rename = "artists_thumbnail", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "_id", serialize_with = "hex_id")]
    pub id: ObjectId,
    pub name: String,
}

/// A song as stored: references are bare ids.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub url: String,
    pub original_name: String,
    pub album: ObjectId,
    pub genre: ObjectId,
    #[serde(default)]
    pub artists: Vec<ObjectId>,
    #[serde(default)]
    pub lyrics: Option<String>,
}

/// A song with album, genre and artists expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    #[serde(rename = "_id", serialize_with = "hex_id")]
    pub id: ObjectId,
    pub title: String,
    pub url: String,
    pub original_name: String,
    pub album: Option<Album>,
    pub genre: Option<Genre>,
    pub artists: Vec<Artist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
}

/// Referenced documents gathered for a batch of songs.
#[derive(Debug, Default)]
pub struct References {
    pub albums: HashMap<ObjectId, Album>,
    pub genres: HashMap<ObjectId, Genre>,
    pub artists: HashMap<ObjectId, Artist>,
}

impl References {
    pub fn new(albums: Vec<Album>, genres: Vec<Genre>, artists: Vec<Artist>) -> Self {
        Self {
            albums: albums.into_iter().map(|a| (a.id, a)).collect(),
            genres: genres.into_iter().map(|g| (g.id, g)).collect(),
            artists: artists.into_iter().map(|a| (a.id, a)).collect(),
        }
    }
}

impl SongRecord {
    /// Expand references. Dangling ids become `None` or are dropped from
    /// `artists`; artist order is preserved.
    pub fn populate(self, refs: &References) -> Song {
        Song {
            id: self.id,
            album: refs.albums.get(&self.album).cloned(),
            genre: refs.genres.get(&self.genre).cloned(),
            artists: self
                .artists
                .iter()
                .filter_map(|id| refs.artists.get(id).cloned())
                .collect(),
            title: self.title,
            url: self.url,
            original_name: self.original_name,
            lyrics: self.lyrics,
        }
    }
}
