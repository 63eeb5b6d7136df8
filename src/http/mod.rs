//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, typed query extraction)
//!     → catalog.rs (JSON catalog endpoints)
//!       media.rs (streaming proxy endpoints)
//!     → response.rs (error mapping)
//!     → Send to client
//! ```

pub mod catalog;
pub mod media;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CatalogQuery, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
