//! Typed query filters.
//!
//! Each filter struct is deserialized straight from the request query string.
//! Every optional field maps to exactly one predicate; empty values are
//! treated as absent. Text filters are case-insensitive substring matches on
//! the literal input.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_LIMIT: u32 = 10;

/// Parse a numeric query value, treating a blank one as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(D::Error::custom),
    }
}

/// `limit`/`offset` paging shared by every listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "PageQuery")]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    #[serde(deserialize_with = "blank_as_none")]
    limit: Option<u32>,
    #[serde(deserialize_with = "blank_as_none")]
    offset: Option<u32>,
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        let defaults = Self::default();
        Self {
            limit: query.limit.unwrap_or(defaults.limit),
            offset: query.offset.unwrap_or(defaults.offset),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Case-insensitive "contains" predicate for a text field.
pub fn contains_ci(value: &str) -> Document {
    doc! { "$regex": regex::escape(value), "$options": "i" }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtistFilter {
    pub name: Option<String>,
}

impl ArtistFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(name) = present(&self.name) {
            filter.insert("name", contains_ci(name));
        }
        filter
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenreFilter {
    pub name: Option<String>,
}

impl GenreFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(name) = present(&self.name) {
            filter.insert("name", contains_ci(name));
        }
        filter
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlbumFilter {
    pub code: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub year: Option<i32>,
}

impl AlbumFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(code) = present(&self.code) {
            filter.insert("code", contains_ci(code));
        }
        if let Some(title) = present(&self.title) {
            filter.insert("title", contains_ci(title));
        }
        if let Some(year) = self.year {
            filter.insert("year", year);
        }
        filter
    }
}

/// Song filters. The album, genre and artist conditions are resolved to id
/// sets in their own collections first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SongFilter {
    pub original_name: Option<String>,
    pub album_title: Option<String>,
    pub album_code: Option<String>,
    pub genre_name: Option<String>,
    pub artist_name: Option<String>,
}

/// Id sets produced by the reference lookups. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRefs {
    pub albums: Option<Vec<ObjectId>>,
    pub genres: Option<Vec<ObjectId>>,
    pub artists: Option<Vec<ObjectId>>,
}

impl SongFilter {
    /// Predicate over `albums`, if the song filter constrains the album.
    /// The code is matched exactly, the title as a substring.
    pub fn album_lookup(&self) -> Option<Document> {
        let title = present(&self.album_title);
        let code = present(&self.album_code);
        if title.is_none() && code.is_none() {
            return None;
        }

        let mut filter = Document::new();
        if let Some(title) = title {
            filter.insert("title", contains_ci(title));
        }
        if let Some(code) = code {
            filter.insert("code", code);
        }
        Some(filter)
    }

    pub fn genre_lookup(&self) -> Option<Document> {
        present(&self.genre_name).map(|name| doc! { "name": contains_ci(name) })
    }

    pub fn artist_lookup(&self) -> Option<Document> {
        present(&self.artist_name).map(|name| doc! { "name": contains_ci(name) })
    }

    /// Predicate over `songs`, given the resolved reference ids.
    pub fn to_document(&self, refs: &ResolvedRefs) -> Document {
        let mut filter = Document::new();
        if let Some(name) = present(&self.original_name) {
            filter.insert("original_name", contains_ci(name));
        }
        if let Some(ids) = &refs.albums {
            filter.insert("album", doc! { "$in": ids.clone() });
        }
        if let Some(ids) = &refs.genres {
            filter.insert("genre", doc! { "$in": ids.clone() });
        }
        if let Some(ids) = &refs.artists {
            filter.insert("artists", doc! { "$in": ids.clone() });
        }
        filter
    }
}
