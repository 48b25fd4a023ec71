use indicatif::ProgressBar;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::github::client::ensure_success;
use crate::github::rate_limiter::RateLimiter;

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
    progress: Option<&'a ProgressBar>,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetches pages until one contains an item `keep` rejects. Rejected items
    /// are dropped and no further pages are requested.
    pub async fn fetch_while<T, F>(&self, base_url: &str, per_page: u32, mut keep: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            self.rate_limiter.wait().await;

            let separator = if base_url.contains('?') { "&" } else { "?" };
            let url = format!("{}{}per_page={}&page={}", base_url, separator, per_page, page);

            tracing::debug!("Fetching: {}", url);
            let response = self.client.get(&url).send().await?;
            self.rate_limiter.update_from_headers(response.headers()).await;
            let response = ensure_success(response, self.rate_limiter, &url).await?;

            // Check for next page in Link header
            let has_next = response
                .headers()
                .get("link")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("rel=\"next\""))
                .unwrap_or(false);

            let items: Vec<T> = response.json().await?;
            let items_count = items.len();
            let mut exhausted = false;
            for item in items {
                if keep(&item) {
                    all_items.push(item);
                } else {
                    exhausted = true;
                }
            }

            if let Some(progress) = self.progress {
                progress.set_message(format!("{} items fetched (page {})", all_items.len(), page));
                progress.tick();
            }

            if exhausted || !has_next || items_count < per_page as usize {
                break;
            }

            page += 1;
        }

        Ok(all_items)
    }
}
