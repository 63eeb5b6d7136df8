//! Resilience subsystem for upstream calls.
//!
//! # Data Flow
//! ```text
//! Request to the object store:
//!     → timeouts.rs (optional deadline for response headers)
//!     → On failure: retries.rs (check if retryable, retry with backoff)
//! ```
//!
//! # Design Decisions
//! - Both layers are off by default: upstream calls fail fast
//! - Only the HEAD probe and the initial GET are retried; a body that has
//!   started streaming to the client is never replayed
//! - Jittered backoff prevents thundering herd

pub mod retries;
pub mod timeouts;

pub use retries::{is_retryable, RetryPolicy};
pub use timeouts::with_deadline;
