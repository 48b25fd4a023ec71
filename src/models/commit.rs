use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Response shape of `GET /repos/{owner}/{repo}/commits/{ref}`, trimmed to what
/// boundary resolution needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: CommitSignature,
    pub committer: CommitSignature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl CommitSummary {
    /// The point in history this commit marks. Committer time is used because
    /// that is when the commit landed on the branch.
    pub fn landed_at(&self) -> DateTime<Utc> {
        self.commit.committer.date
    }
}
