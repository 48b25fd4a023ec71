use std::str::FromStr;

use crate::error::{Error, Result};

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }

    pub fn pull_url(&self, number: u64) -> String {
        format!("{}/pull/{}", self.html_url(), number)
    }

    pub fn issue_url(&self, number: u64) -> String {
        format!("{}/issues/{}", self.html_url(), number)
    }

    /// Case-insensitive comparison against an `owner/name` string.
    pub fn matches(&self, full_name: &str) -> bool {
        full_name.eq_ignore_ascii_case(&self.to_string())
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = Error;

    /// Accepts `owner/name` or a GitHub URL such as `https://github.com/owner/name.git`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("github.com/")
            .trim_end_matches('/')
            .trim_end_matches(".git");

        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::Config(format!(
                "Repository must be given as OWNER/REPO, got '{}'",
                s
            ))),
        }
    }
}
