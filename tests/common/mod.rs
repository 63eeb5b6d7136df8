//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mongodb::bson::oid::ObjectId;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use arythm_server::catalog::{
    Album, AlbumFilter, Artist, ArtistFilter, CatalogStore, Genre, GenreFilter, Pagination, Song,
    SongFilter, StoreError, StoreResult,
};
use arythm_server::config::ServiceConfig;
use arythm_server::HttpServer;

/// What the mock upstream saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub range: Option<String>,
}

/// Canned upstream reply.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A programmable object store listening on an ephemeral port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock upstream answering every request with `handler`.
pub async fn start_mock_upstream<F>(handler: F) -> MockUpstream
where
    F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        recorded.lock().unwrap().push(request.clone());

                        let response = handler(&request);
                        let reason = StatusCode::from_u16(response.status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");

                        let mut head = format!("HTTP/1.1 {} {}\r\n", response.status, reason);
                        for (name, value) in &response.headers {
                            head.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        head.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n",
                            response.body.len()
                        ));

                        let _ = socket.write_all(head.as_bytes()).await;
                        if request.method != "HEAD" {
                            let _ = socket.write_all(&response.body).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockUpstream { addr, requests }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let range = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("range"))
        .map(|(_, value)| value.trim().to_string());

    Some(RecordedRequest { method, path, range })
}

/// Handler serving one file, honoring single `bytes=start-end` ranges.
pub fn serve_file(
    content: Vec<u8>,
    content_type: &'static str,
) -> impl Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static {
    move |request| {
        let ranged = request
            .range
            .as_deref()
            .and_then(|r| r.strip_prefix("bytes="))
            .and_then(|r| r.split_once('-'))
            .and_then(|(s, e)| Some((s.parse::<usize>().ok()?, e.parse::<usize>().ok()?)));

        match ranged {
            Some((start, end)) if request.method == "GET" => {
                MockResponse::new(206, content[start..=end].to_vec())
                    .header("Content-Type", content_type)
                    .header(
                        "Content-Range",
                        &format!("bytes {}-{}/{}", start, end, content.len()),
                    )
            }
            _ => MockResponse::new(200, content.clone()).header("Content-Type", content_type),
        }
    }
}

/// A base URI nothing listens on.
pub async fn unreachable_uri() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn test_config(src_uri: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.upstream.src_uri = src_uri.to_string();
    config.upstream.use_system_proxy = false;
    config
}

pub fn build_app(config: ServiceConfig, catalog: Arc<dyn CatalogStore>) -> Router {
    HttpServer::new(config, catalog).unwrap().into_router()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// In-memory catalog counting every call it receives.
#[derive(Default)]
pub struct MemoryCatalog {
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub genres: Vec<Genre>,
    pub failure: Option<String>,
    calls: AtomicUsize,
    last_page: Mutex<Option<Pagination>>,
}

impl MemoryCatalog {
    /// A catalog whose every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_page(&self) -> Option<Pagination> {
        *self.last_page.lock().unwrap()
    }

    fn enter(&self, page: Option<Pagination>) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if page.is_some() {
            *self.last_page.lock().unwrap() = page;
        }
        match &self.failure {
            Some(message) => Err(StoreError::Query(message.clone())),
            None => Ok(()),
        }
    }
}

fn contains(haystack: &str, needle: &Option<String>) -> bool {
    match needle.as_deref() {
        Some(needle) if !needle.is_empty() => {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        _ => true,
    }
}

fn paginate<T: Clone>(items: impl Iterator<Item = T>, page: Pagination) -> Vec<T> {
    items
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn equals(value: &str, expected: &Option<String>) -> bool {
    match expected.as_deref() {
        Some(expected) if !expected.is_empty() => value == expected,
        _ => true,
    }
}

fn song_matches(song: &Song, filter: &SongFilter) -> bool {
    let album_filtered = [&filter.album_title, &filter.album_code]
        .iter()
        .any(|f| f.as_deref().is_some_and(|v| !v.is_empty()));

    contains(&song.original_name, &filter.original_name)
        && song.album.as_ref().map_or(!album_filtered, |a| {
            contains(&a.title, &filter.album_title) && equals(&a.code, &filter.album_code)
        })
        && song
            .genre
            .as_ref()
            .map_or(filter.genre_name.is_none(), |g| contains(&g.name, &filter.genre_name))
        && (filter.artist_name.is_none()
            || song.artists.iter().any(|a| contains(&a.name, &filter.artist_name)))
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn songs(&self, filter: &SongFilter, page: Pagination) -> StoreResult<Vec<Song>> {
        self.enter(Some(page))?;
        Ok(paginate(
            self.songs.iter().filter(|s| song_matches(s, filter)).cloned(),
            page,
        ))
    }

    async fn song(&self, id: ObjectId) -> StoreResult<Option<Song>> {
        self.enter(None)?;
        Ok(self.songs.iter().find(|s| s.id == id).cloned())
    }

    async fn random_song(&self, filter: &SongFilter) -> StoreResult<Option<Song>> {
        self.enter(None)?;
        Ok(self.songs.iter().find(|s| song_matches(s, filter)).cloned())
    }

    async fn artists(&self, filter: &ArtistFilter, page: Pagination) -> StoreResult<Vec<Artist>> {
        self.enter(Some(page))?;
        Ok(paginate(
            self.artists.iter().filter(|a| contains(&a.name, &filter.name)).cloned(),
            page,
        ))
    }

    async fn artist(&self, id: ObjectId) -> StoreResult<Option<Artist>> {
        self.enter(None)?;
        Ok(self.artists.iter().find(|a| a.id == id).cloned())
    }

    async fn albums(&self, filter: &AlbumFilter, page: Pagination) -> StoreResult<Vec<Album>> {
        self.enter(Some(page))?;
        Ok(paginate(
            self.albums
                .iter()
                .filter(|a| contains(&a.code, &filter.code) && contains(&a.title, &filter.title))
                .filter(|a| filter.year.map_or(true, |year| a.year == year))
                .cloned(),
            page,
        ))
    }

    async fn album(&self, id: ObjectId) -> StoreResult<Option<Album>> {
        self.enter(None)?;
        Ok(self.albums.iter().find(|a| a.id == id).cloned())
    }

    async fn genres(&self, filter: &GenreFilter, page: Pagination) -> StoreResult<Vec<Genre>> {
        self.enter(Some(page))?;
        Ok(paginate(
            self.genres.iter().filter(|g| contains(&g.name, &filter.name)).cloned(),
            page,
        ))
    }

    async fn genre(&self, id: ObjectId) -> StoreResult<Option<Genre>> {
        self.enter(None)?;
        Ok(self.genres.iter().find(|g| g.id == id).cloned())
    }
}

/// A small catalog: two artists, one album, one genre, two songs.
pub fn sample_catalog() -> MemoryCatalog {
    let album = Album {
        id: ObjectId::new(),
        code: "LP-01".into(),
        title: "Night Drive".into(),
        year: 2020,
        thumbnail_300x300: Some("album-images/300x300/night-drive.jpg".into()),
        thumbnail: Some("album-images/1200x1200/night-drive.jpg".into()),
    };
    let genre = Genre {
        id: ObjectId::new(),
        name: "Synthwave".into(),
    };
    let nova = Artist {
        id: ObjectId::new(),
        name: "Nova".into(),
        thumbnail_300x300: None,
        thumbnail: None,
    };
    let echo = Artist {
        id: ObjectId::new(),
        name: "Echo Park".into(),
        thumbnail_300x300: None,
        thumbnail: None,
    };
    let songs = vec![
        Song {
            id: ObjectId::new(),
            title: "Neon Skyline".into(),
            url: "songs-file/neon-skyline.mp3".into(),
            original_name: "neon_skyline".into(),
            album: Some(album.clone()),
            genre: Some(genre.clone()),
            artists: vec![nova.clone()],
            lyrics: Some("lrc/neon-skyline.lrc".into()),
        },
        Song {
            id: ObjectId::new(),
            title: "Afterglow".into(),
            url: "songs-file/afterglow.mp3".into(),
            original_name: "afterglow".into(),
            album: Some(album.clone()),
            genre: Some(genre.clone()),
            artists: vec![nova.clone(), echo.clone()],
            lyrics: None,
        },
    ];

    MemoryCatalog {
        songs,
        artists: vec![nova, echo],
        albums: vec![album],
        genres: vec![genre],
        ..MemoryCatalog::default()
    }
}
