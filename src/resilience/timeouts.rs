//! Timeout enforcement.
//!
//! Deadlines cover the wait for upstream response headers only. Streaming a
//! song can legitimately take minutes, so the body is never given a deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, error::Elapsed};

/// Await `future`, bounded by `deadline` when one is configured.
pub async fn with_deadline<F, T>(deadline: Option<Duration>, future: F) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    match deadline {
        Some(limit) => time::timeout(limit, future).await,
        None => Ok(future.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_deadline_waits() {
        let value = with_deadline(None, async {
            time::sleep(Duration::from_millis(20)).await;
            7
        })
        .await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let result = with_deadline(Some(Duration::from_millis(10)), async {
            time::sleep(Duration::from_secs(5)).await;
        })
        .await;
        assert!(result.is_err());
    }
}
