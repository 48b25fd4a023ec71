use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::github::references::closing_issue_references;
use crate::models::repository::RepoSlug;

/// A closed pull request as handed to the changelog pipeline.
///
/// Created once by the fetcher and never modified afterwards; every pipeline
/// stage works on borrowed or cloned copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: Option<String>,
    /// `None` when the pull request was closed without being merged.
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit: Option<String>,
    pub labels: BTreeSet<String>,
    pub linked_issues: BTreeSet<u64>,
    pub base_branch: String,
}

impl PullRequest {
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            author: None,
            merged_at: None,
            merge_commit: None,
            labels: BTreeSet::new(),
            linked_issues: BTreeSet::new(),
            base_branch: "main".to_string(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn merged(mut self, at: DateTime<Utc>) -> Self {
        self.merged_at = Some(at);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    pub fn linking(mut self, issue: u64) -> Self {
        self.linked_issues.insert(issue);
        self
    }

    pub fn targeting(mut self, branch: impl Into<String>) -> Self {
        self.base_branch = branch.into();
        self
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }
}

/// Response shape of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub user: Option<GitHubAccount>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    pub base: GitHubBranchRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAccount {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubBranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}

impl GitHubPullRequest {
    pub fn into_pull_request(self, repo: &RepoSlug) -> PullRequest {
        let linked_issues = self
            .body
            .as_deref()
            .map(|body| closing_issue_references(body, repo))
            .unwrap_or_default();

        PullRequest {
            number: self.number,
            title: self.title,
            author: self.user.map(|u| u.login),
            merged_at: self.merged_at,
            merge_commit: self.merge_commit_sha,
            labels: self.labels.into_iter().map(|l| l.name).collect(),
            linked_issues,
            base_branch: self.base.name,
        }
    }
}
