use serde::Serialize;
use std::collections::BTreeSet;

use super::boundary::ResolvedBoundary;
use super::pull_request::PullRequest;

/// A named changelog section. Display order comes from the configured
/// category order, not from the name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const OTHER: &'static str = "Other";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Fallback for pull requests no rule matches.
    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_other(&self) -> bool {
        self.0 == Self::OTHER
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPullRequest {
    pub pull_request: PullRequest,
    pub category: Category,
}

/// One changelog line, built from every pull request describing the same change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub title: String,
    pub category: Category,
    pub contributors: BTreeSet<String>,
    pub pull_requests: BTreeSet<u64>,
    pub linked_issues: BTreeSet<u64>,
}

impl ChangelogEntry {
    /// Lowest source pull request number; the sort key within a section.
    pub fn first_pull_request(&self) -> u64 {
        self.pull_requests.iter().next().copied().unwrap_or(0)
    }
}

/// Output of one generation run, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    pub boundary: ResolvedBoundary,
    pub entries: Vec<ChangelogEntry>,
    pub category_order: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pull_request() {
        let entry = ChangelogEntry {
            title: "Fix crash".to_string(),
            category: Category::other(),
            contributors: BTreeSet::new(),
            pull_requests: [21, 20, 35].into_iter().collect(),
            linked_issues: BTreeSet::new(),
        };
        assert_eq!(entry.first_pull_request(), 20);
    }

    #[test]
    fn test_category_serializes_as_name() {
        let json = serde_json::to_string(&Category::new("Features")).unwrap();
        assert_eq!(json, "\"Features\"");
        assert!(Category::other().is_other());
    }
}
