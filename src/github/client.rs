use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, Client, Response, StatusCode};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::RateLimiter;
use crate::github::source::PullRequestSource;
use crate::models::{CommitSummary, GitHubPullRequest, PullRequest, RepoSlug};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
    repo: RepoSlug,
    per_page: u32,
    progress: ProgressBar,
}

impl GitHubClient {
    pub fn new(config: &Config, repo: RepoSlug) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.github_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("pr-changelog/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            repo,
            per_page: config.per_page,
            progress: ProgressBar::hidden(),
        })
    }

    /// Shows a spinner on stderr while pull requests are paginated.
    pub fn with_progress(mut self) -> Self {
        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            progress.set_style(style);
        }
        self.progress = progress;
        self
    }

    pub async fn get_commit(&self, reference: &str) -> Result<CommitSummary> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}/commits/{}", self.base_url, self.repo, reference);
        tracing::debug!("Resolving reference: {}", reference);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_headers(response.headers()).await;

        match response.status() {
            StatusCode::UNPROCESSABLE_ENTITY => {
                return Err(Error::BoundaryResolution(reference.to_string()));
            }
            // Unknown refs and unknown repositories both come back as 404
            StatusCode::NOT_FOUND => {
                return Err(if self.repository_exists().await? {
                    Error::BoundaryResolution(reference.to_string())
                } else {
                    Error::RepoNotFound(self.repo.to_string())
                });
            }
            _ => {}
        }

        let response = ensure_success(response, &self.rate_limiter, &url).await?;
        Ok(response.json().await?)
    }

    async fn repository_exists(&self) -> Result<bool> {
        self.rate_limiter.wait().await;
        let url = format!("{}/repos/{}", self.base_url, self.repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_headers(response.headers()).await;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response, &self.rate_limiter, &url).await?;
        Ok(true)
    }

    /// Closed pull requests, most recently updated first, stopping at the
    /// first one last updated before `since`.
    pub async fn list_closed_pull_requests(&self, since: DateTime<Utc>) -> Result<Vec<GitHubPullRequest>> {
        let url = format!(
            "{}/repos/{}/pulls?state=closed&sort=updated&direction=desc",
            self.base_url, self.repo
        );
        tracing::info!("Fetching pull requests for {} updated since {}", self.repo, since);

        self.progress.set_message(format!("Fetching pull requests for {}", self.repo));
        self.progress.enable_steady_tick(Duration::from_millis(120));

        let paginator = Paginator::new(&self.client, &self.rate_limiter).with_progress(&self.progress);
        let result = paginator
            .fetch_while(&url, self.per_page, |pr: &GitHubPullRequest| pr.updated_at >= since)
            .await;

        self.progress.finish_and_clear();
        result
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn resolve_ref(&self, reference: &str) -> Result<DateTime<Utc>> {
        let commit = self.get_commit(reference).await?;
        tracing::info!("{} -> {} ({})", reference, &commit.sha, commit.landed_at());
        Ok(commit.landed_at())
    }

    async fn closed_pull_requests(&self, since: DateTime<Utc>) -> Result<Vec<PullRequest>> {
        let pulls = self.list_closed_pull_requests(since).await?;
        tracing::info!("Fetched {} closed pull requests", pulls.len());
        Ok(pulls
            .into_iter()
            .map(|pr| pr.into_pull_request(&self.repo))
            .collect())
    }

    fn name(&self) -> &str {
        "github"
    }
}

/// Turns a non-success response into the matching error.
pub(crate) async fn ensure_success(
    response: Response,
    rate_limiter: &RateLimiter,
    context: &str,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && rate_limiter.remaining().await == Some(0)
    {
        return Err(Error::RateLimited(rate_limiter.seconds_until_reset().await));
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return Err(Error::RepoNotFound(format!("{} ({})", context, body.trim())));
    }
    Err(Error::GitHubApi(format!("{} returned {} - {}", context, status, body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitHubClient {
        let config = Config {
            api_url: server.uri(),
            ..Config::default()
        };
        GitHubClient::new(&config, "o/r".parse().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_ref_uses_committer_date() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/r/commits/v1.0.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
                "commit": {
                    "message": "Release v1.0.0",
                    "author": {"name": "A", "email": "a@example.com", "date": "2024-01-01T10:00:00Z"},
                    "committer": {"name": "B", "email": "b@example.com", "date": "2024-01-02T10:00:00Z"}
                }
            })))
            .mount(&mock_server)
            .await;

        let at = client(&mock_server).resolve_ref("v1.0.0").await.unwrap();
        assert_eq!(at.to_rfc3339(), "2024-01-02T10:00:00+00:00");
    }

    #[tokio::test]
    async fn test_unknown_ref_in_existing_repository() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/r/commits/v9.9.9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/o/r"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"full_name": "o/r"})))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server).resolve_ref("v9.9.9").await.unwrap_err();
        assert!(matches!(err, Error::BoundaryResolution(ref name) if name == "v9.9.9"));
    }

    #[tokio::test]
    async fn test_missing_repository_is_reported_as_such() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server).resolve_ref("v1.0.0").await.unwrap_err();
        assert!(matches!(err, Error::RepoNotFound(ref repo) if repo == "o/r"));
        assert_eq!(err.kind(), crate::error::ErrorKind::Fetch);
    }
}
