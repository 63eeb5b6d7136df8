//! Media streaming endpoints.
//!
//! Request checks (range syntax, path allowlist) run before any upstream
//! call. Bodies are piped with `Body::from_stream`; when the client goes
//! away axum drops the stream and the upstream connection with it.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::media::{ByteRange, MediaError, RangeRequest, ResourceCategory, UpstreamError};

/// `GET /stream/image/{*path}`
pub async fn stream_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, MediaError> {
    let resource = ResourceCategory::Image.validate(&path)?;
    let upstream = state.upstream.fetch(&resource, None).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    Ok((
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

/// `GET /stream/song/{*path}`
pub async fn stream_song(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, MediaError> {
    let range_header = match headers.get(header::RANGE) {
        Some(value) => Some(value.to_str().map_err(|_| MediaError::RangeNotSatisfiable)?),
        None => None,
    };
    let request = RangeRequest::from_header(range_header)?;
    let resource = ResourceCategory::Song.validate(&path)?;

    let total_size = state.upstream.probe_size(&resource).await?;
    let range = request.resolve(total_size)?;

    let upstream = state.upstream.fetch(&resource, Some(range)).await?;
    match upstream.status() {
        StatusCode::PARTIAL_CONTENT => {}
        StatusCode::OK if range.is_full(total_size) => {}
        _ => return Err(UpstreamError::RangeIgnored.into()),
    }
    if !delivers_range(upstream.headers(), range) {
        return Err(UpstreamError::RangeIgnored.into());
    }

    tracing::debug!(
        path = %resource.as_str(),
        start = range.start,
        end = range.end,
        total_size,
        "Streaming song range"
    );

    Ok((
        StatusCode::PARTIAL_CONTENT,
        [
            (header::CONTENT_RANGE, range.content_range(total_size)),
            (header::ACCEPT_RANGES, "bytes".to_string()),
            (header::CONTENT_LENGTH, range.content_length().to_string()),
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

/// True when the upstream headers describe exactly `range`. The declared
/// `Content-Length` must hold for the piped body, so a shorter or shifted
/// answer is refused before any byte is sent.
fn delivers_range(headers: &HeaderMap, range: ByteRange) -> bool {
    let content_range = headers
        .get(header::CONTENT_RANGE)
        .map(|value| value.to_str().ok().and_then(parse_content_range));
    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .map(|value| value.to_str().ok().and_then(|v| v.trim().parse::<u64>().ok()));

    if content_range.is_none() && content_length.is_none() {
        return false;
    }
    let range_ok = content_range.map_or(true, |bounds| bounds == Some((range.start, range.end)));
    let length_ok = content_length.map_or(true, |length| length == Some(range.content_length()));
    range_ok && length_ok
}

/// `bytes <start>-<end>/<total or *>` to its bounds.
fn parse_content_range(value: &str) -> Option<(u64, u64)> {
    let (bounds, _total) = value.trim().strip_prefix("bytes ")?.split_once('/')?;
    let (start, end) = bounds.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

/// `GET /get/lyric/{*path}`
pub async fn get_lyric(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, MediaError> {
    let resource = ResourceCategory::Lyric.validate(&path)?;
    let upstream = state.upstream.fetch(&resource, None).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain")],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
