//! Error responses.
//!
//! # Responsibilities
//! - Map catalog errors to JSON `{"message": ...}` bodies
//! - Map media errors to plain-text bodies
//! - Log server-side failures once, at the boundary
//!
//! # Design Decisions
//! - Upstream failure details stay in the logs; clients see "Server Error"
//! - Store failures are reported with their message, as clients rely on it

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::StoreError;
use crate::media::MediaError;

/// Errors of the JSON catalog endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid ID format")]
    InvalidId,

    #[error("{0}")]
    BadQuery(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::BadQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Store(e) = &self {
            tracing::error!(error = %e, "Catalog query failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl MediaError {
    pub fn status(&self) -> StatusCode {
        match self {
            MediaError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            MediaError::RangeRequired | MediaError::RangeNotSatisfiable => {
                StatusCode::RANGE_NOT_SATISFIABLE
            }
            MediaError::NotFound(_) => StatusCode::NOT_FOUND,
            MediaError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            MediaError::Upstream(e) => {
                tracing::error!(error = %e, "Upstream fetch failed");
                (status, "Server Error").into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}
