use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::PullRequest;

/// Where the changelog pipeline gets its data from.
///
/// Implementations hold whatever client state they need (tokens, rate-limit
/// counters); the pipeline only ever sees fully fetched, immutable results.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Point in history a tag, branch or commit reference marks. Fails with
    /// `Error::BoundaryResolution` when the reference does not exist.
    async fn resolve_ref(&self, reference: &str) -> Result<DateTime<Utc>>;

    /// Every closed pull request that could have been merged at or after
    /// `since`. May include unmerged and out-of-window pull requests.
    async fn closed_pull_requests(&self, since: DateTime<Utc>) -> Result<Vec<PullRequest>>;

    fn name(&self) -> &str;
}
