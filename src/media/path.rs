//! Resource path allowlist.
//!
//! # Responsibilities
//! - Map each media endpoint to the path patterns it may proxy
//! - Reject anything else before the object store is contacted
//! - Build the upstream URL for an accepted path
//!
//! # Design Decisions
//! - Patterns are anchored; one file segment, no nested directories
//! - Image sizes are an enumerated set, not a free-form `WxH`
//! - Dot segments are refused even though they satisfy `[^/]+`
//! - The whole path is sent upstream as a single percent-encoded segment

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use url::Url;

use crate::media::MediaError;

/// Escape everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, so reserved
/// characters such as `+` and `&` reach the object store literally.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static IMAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"^album-images/(300x300|1200x1200)/[^/]+$",
        r"^artist-images/(300x300|1200x1200)/[^/]+$",
    ])
});

static SONG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(&[r"^songs-file/[^/]+$"]));

static LYRIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(&[r"^lrc/[^/]+$"]));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("allowlist pattern is a valid regex"))
        .collect()
}

/// Endpoint category a resource is requested through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    /// Album and artist artwork.
    Image,
    /// Audio files, served with byte ranges.
    Song,
    /// Plain-text `.lrc` lyrics.
    Lyric,
}

impl ResourceCategory {
    fn patterns(self) -> &'static [Regex] {
        match self {
            ResourceCategory::Image => &IMAGE_PATTERNS,
            ResourceCategory::Song => &SONG_PATTERNS,
            ResourceCategory::Lyric => &LYRIC_PATTERNS,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            ResourceCategory::Image => "image",
            ResourceCategory::Song => "song",
            ResourceCategory::Lyric => "lyric",
        }
    }

    pub fn invalid_path_message(self) -> &'static str {
        match self {
            ResourceCategory::Image => "Invalid image path",
            ResourceCategory::Song => "Invalid song file path",
            ResourceCategory::Lyric => "Invalid lyrics file path",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            ResourceCategory::Image => "Image not found",
            ResourceCategory::Song => "Song file not found",
            ResourceCategory::Lyric => "Lyrics file not found",
        }
    }

    /// Returns true if `path` may be proxied through this category.
    pub fn is_allowed(self, path: &str) -> bool {
        if path.split('/').any(|segment| segment == "." || segment == "..") {
            return false;
        }
        self.patterns().iter().any(|pattern| pattern.is_match(path))
    }

    /// Validate `path`, producing a [`ResourcePath`] that is safe to fetch.
    pub fn validate(self, path: &str) -> Result<ResourcePath, MediaError> {
        if self.is_allowed(path) {
            Ok(ResourcePath {
                category: self,
                path: path.to_string(),
            })
        } else {
            Err(MediaError::InvalidPath(self))
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resource path that passed the allowlist for its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    category: ResourceCategory,
    path: String,
}

impl ResourcePath {
    pub fn category(&self) -> ResourceCategory {
        self.category
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Append this path to `base` as one percent-encoded segment.
    pub fn upstream_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let encoded = utf8_percent_encode(&self.path, SEGMENT);
        url.set_path(&format!("{}/{}", base.path().trim_end_matches('/'), encoded));
        url
    }
}
