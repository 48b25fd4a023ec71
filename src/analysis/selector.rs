use std::collections::BTreeSet;

use crate::models::{PullRequest, ResolvedBoundary};
use crate::taxonomy::LabelPattern;

/// Everything besides the boundary that decides whether a pull request belongs
/// in the changelog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRules {
    pub exclude_labels: Vec<LabelPattern>,
    /// Only pull requests targeting this branch qualify when set.
    pub base_branch: Option<String>,
    /// Pull requests an existing changelog already lists.
    pub skip_pull_requests: BTreeSet<u64>,
}

impl SelectionRules {
    fn is_excluded(&self, pr: &PullRequest) -> bool {
        self.exclude_labels
            .iter()
            .any(|pattern| pattern.matches_any(&pr.labels))
    }

    fn targets_branch(&self, pr: &PullRequest) -> bool {
        self.base_branch
            .as_deref()
            .map_or(true, |branch| pr.base_branch == branch)
    }

    pub fn qualifies(&self, pr: &PullRequest, boundary: &ResolvedBoundary) -> bool {
        let in_window = pr.merged_at.is_some_and(|at| boundary.contains(at));
        in_window
            && self.targets_branch(pr)
            && !self.is_excluded(pr)
            && !self.skip_pull_requests.contains(&pr.number)
    }
}

/// Keeps merged pull requests inside `boundary` that no rule disqualifies.
/// Input order is preserved.
pub fn select(
    pull_requests: &[PullRequest],
    boundary: &ResolvedBoundary,
    rules: &SelectionRules,
) -> Vec<PullRequest> {
    let selected: Vec<PullRequest> = pull_requests
        .iter()
        .filter(|pr| rules.qualifies(pr, boundary))
        .cloned()
        .collect();

    tracing::debug!(
        "Selected {} of {} pull requests for {}",
        selected.len(),
        pull_requests.len(),
        boundary.boundary
    );
    selected
}
