//! Media streaming subsystem.
//!
//! # Data Flow
//! ```text
//! /stream/song/<path> + Range header
//!     → range.rs (syntax check, 416 when absent or malformed)
//!     → path.rs (allowlist, 400 when refused)
//!     → upstream.rs HEAD (total size)
//!     → range.rs resolve (416 when outside the resource)
//!     → upstream.rs ranged GET
//!     → 206 with the upstream body piped through
//!
//! /stream/image/<path>, /get/lyric/<path>
//!     → path.rs → upstream.rs GET → 200 with the body piped through
//! ```
//!
//! # Design Decisions
//! - Every refusal happens before any network call
//! - Bodies are streamed, never buffered

pub mod path;
pub mod range;
pub mod upstream;

use thiserror::Error;

pub use path::{ResourceCategory, ResourcePath};
pub use range::{parse_range, ByteRange, RangeRequest};
pub use upstream::{UpstreamClient, UpstreamError};

/// Everything that can stop a media request.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{}", .0.invalid_path_message())]
    InvalidPath(ResourceCategory),

    #[error("Range header required")]
    RangeRequired,

    #[error("Requested range not satisfiable")]
    RangeNotSatisfiable,

    #[error("{}", .0.not_found_message())]
    NotFound(ResourceCategory),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
