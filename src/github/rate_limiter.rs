use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Tracks GitHub's `x-ratelimit-*` headers and holds requests back once the
/// quota is spent.
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
}

#[derive(Debug, Default)]
struct RateLimitState {
    remaining: Option<u32>,
    reset_at: Option<DateTime<Utc>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState::default())),
        }
    }

    pub async fn wait(&self) {
        let wait_duration = {
            let state = self.state.lock().await;
            match (state.remaining, state.reset_at) {
                (Some(0), Some(reset_at)) => (reset_at - Utc::now()).to_std().ok(),
                _ => None,
            }
        };

        if let Some(duration) = wait_duration {
            tracing::info!("Rate limited, waiting {:?}", duration);
            sleep(duration).await;
            self.state.lock().await.remaining = None;
        }
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let remaining = header_value::<u32>(headers, "x-ratelimit-remaining");
        let reset = header_value::<i64>(headers, "x-ratelimit-reset")
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

        if remaining.is_none() && reset.is_none() {
            return;
        }

        let mut state = self.state.lock().await;
        if remaining.is_some() {
            state.remaining = remaining;
        }
        if reset.is_some() {
            state.reset_at = reset;
        }
        tracing::debug!("Rate limit remaining: {:?}", state.remaining);
    }

    pub async fn remaining(&self) -> Option<u32> {
        self.state.lock().await.remaining
    }

    /// Seconds until the quota resets, zero when unknown or already past.
    pub async fn seconds_until_reset(&self) -> u64 {
        self.state
            .lock()
            .await
            .reset_at
            .map(|reset_at| (reset_at - Utc::now()).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[tokio::test]
    async fn test_update_from_headers() {
        let limiter = RateLimiter::new();
        assert_eq!(limiter.remaining().await, None);

        let reset = (Utc::now() + chrono::Duration::seconds(120)).timestamp();
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("41"));
        headers.insert(
            "x-ratelimit-reset",
            HeaderValue::from_str(&reset.to_string()).unwrap(),
        );
        limiter.update_from_headers(&headers).await;

        assert_eq!(limiter.remaining().await, Some(41));
        assert!(limiter.seconds_until_reset().await > 60);
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_with_quota_left() {
        let limiter = RateLimiter::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("10"));
        limiter.update_from_headers(&headers).await;

        tokio::time::timeout(std::time::Duration::from_secs(1), limiter.wait())
            .await
            .unwrap();
    }
}
