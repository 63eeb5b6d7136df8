//! Object store client.
//!
//! # Responsibilities
//! - Probe resource size with HEAD
//! - Fetch whole or ranged bodies with GET
//! - Translate upstream statuses into [`MediaError`]
//! - Apply the configured timeout and retry policy
//!
//! # Design Decisions
//! - Responses are returned unread; callers stream the body
//! - Dropping the returned response releases the pooled connection
//! - 404 is final and reported per resource category

use std::time::{Duration, Instant};

use axum::http::{header, Method, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::{RetryConfig, UpstreamConfig};
use crate::media::path::ResourcePath;
use crate::media::range::ByteRange;
use crate::media::MediaError;
use crate::observability::metrics;
use crate::resilience::{is_retryable, with_deadline, RetryPolicy};

/// Failures talking to the object store.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream base URI: {0}")]
    InvalidBase(#[from] url::ParseError),

    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("upstream returned {0}")]
    Status(StatusCode),

    #[error("upstream response has no usable Content-Length")]
    MissingLength,

    #[error("upstream ignored the requested range")]
    RangeIgnored,
}

/// Shared HTTP client for the object store behind `SRC_URI`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base: Url,
    response_timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig, retries: &RetryConfig) -> Result<Self, UpstreamError> {
        let base = Url::parse(&config.src_uri)?;
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base,
            response_timeout: config.response_timeout_secs.map(Duration::from_secs),
            retry: RetryPolicy::from_config(retries),
        })
    }

    pub fn url_for(&self, resource: &ResourcePath) -> Url {
        resource.upstream_url(&self.base)
    }

    /// Learn the total size of a resource without downloading it.
    pub async fn probe_size(&self, resource: &ResourcePath) -> Result<u64, MediaError> {
        let response = self.send(Method::HEAD, resource, None).await?;
        let response = classify(resource, response)?;

        // reqwest reports a zero-length body for HEAD, so read the header itself.
        response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or_else(|| UpstreamError::MissingLength.into())
    }

    /// Start a GET, optionally ranged. The body has not been read yet.
    pub async fn fetch(
        &self,
        resource: &ResourcePath,
        range: Option<ByteRange>,
    ) -> Result<reqwest::Response, MediaError> {
        let response = self.send(Method::GET, resource, range).await?;
        classify(resource, response)
    }

    async fn send(
        &self,
        method: Method,
        resource: &ResourcePath,
        range: Option<ByteRange>,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = self.url_for(resource);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let started = Instant::now();

            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(range) = range {
                request = request.header(header::RANGE, range.header_value());
            }

            let outcome = match with_deadline(self.response_timeout, request.send()).await {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(e)) => Err(UpstreamError::Request(e)),
                Err(_) => Err(UpstreamError::Timeout(
                    self.response_timeout.unwrap_or_default(),
                )),
            };

            let status = outcome.as_ref().ok().map(|response| response.status());
            metrics::record_upstream(method.as_str(), resource.category().label(), status, started);

            if self.retry.should_retry(attempt) && is_retryable(status) {
                let delay = self.retry.backoff(attempt);
                match &outcome {
                    Ok(response) => tracing::info!(
                        url = %url,
                        attempt,
                        status = %response.status(),
                        delay = ?delay,
                        "Retrying upstream request"
                    ),
                    Err(e) => tracing::info!(
                        url = %url,
                        attempt,
                        error = %e,
                        delay = ?delay,
                        "Retrying upstream request after error"
                    ),
                }
                tokio::time::sleep(delay).await;
                continue;
            }

            return outcome;
        }
    }
}

fn classify(
    resource: &ResourcePath,
    response: reqwest::Response,
) -> Result<reqwest::Response, MediaError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        tracing::debug!(path = %resource.as_str(), "Upstream resource not found");
        return Err(MediaError::NotFound(resource.category()));
    }
    if !status.is_success() {
        return Err(UpstreamError::Status(status).into());
    }
    Ok(response)
}
