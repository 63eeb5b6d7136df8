//! Request identification and query extraction.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) unless the client sent one
//! - Echo it back on the response
//! - Parse query strings into typed filters, rejecting with JSON errors
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderName},
};
use serde::de::DeserializeOwned;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response::ApiError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer assigning a request ID to incoming requests.
pub fn set_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Query string extractor whose rejection is an [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for CatalogQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) =
            Query::try_from_uri(&parts.uri).map_err(|e| ApiError::BadQuery(e.body_text()))?;
        Ok(Self(value))
    }
}
