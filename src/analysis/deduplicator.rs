use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Category, ChangelogEntry, ClassifiedPullRequest};
use crate::taxonomy::rank_in;

/// Lowercased alphanumeric words of a title, single-space separated.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title as printed: trimmed, with internal whitespace collapsed.
pub fn display_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    // The smaller index always becomes the root.
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra < rb {
            self.parent[rb] = ra;
        } else if rb < ra {
            self.parent[ra] = rb;
        }
    }
}

/// Merges pull requests that close a common issue or share a normalized title
/// into single entries. Grouping is transitive.
///
/// Each entry takes the title of its lowest-numbered pull request and the
/// category ranked earliest in `category_order`. The result is sorted by lowest
/// source pull request number and does not depend on input order.
pub fn deduplicate(
    classified: Vec<ClassifiedPullRequest>,
    category_order: &[Category],
) -> Vec<ChangelogEntry> {
    let mut classified = classified;
    classified.sort_by_key(|c| {
        (
            c.pull_request.number,
            rank_in(category_order, &c.category),
            c.category.name().to_string(),
        )
    });
    classified.dedup_by_key(|c| c.pull_request.number);

    let mut sets = DisjointSet::new(classified.len());
    let mut by_issue: HashMap<u64, usize> = HashMap::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for (index, item) in classified.iter().enumerate() {
        for issue in &item.pull_request.linked_issues {
            match by_issue.get(issue) {
                Some(&first) => sets.union(first, index),
                None => {
                    by_issue.insert(*issue, index);
                }
            }
        }

        let key = normalize_title(&item.pull_request.title);
        if key.is_empty() {
            continue;
        }
        match by_title.get(&key) {
            Some(&first) => sets.union(first, index),
            None => {
                by_title.insert(key, index);
            }
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for index in 0..classified.len() {
        let root = sets.find(index);
        groups.entry(root).or_default().push(index);
    }

    let entries: Vec<ChangelogEntry> = groups
        .into_values()
        .map(|members| merge_group(&classified, &members, category_order))
        .collect();

    tracing::debug!(
        "Merged {} pull requests into {} entries",
        classified.len(),
        entries.len()
    );
    entries
}

fn merge_group(
    classified: &[ClassifiedPullRequest],
    members: &[usize],
    category_order: &[Category],
) -> ChangelogEntry {
    // members are ascending, so the first one holds the lowest PR number
    let lead = &classified[members[0]].pull_request;

    let category = members
        .iter()
        .map(|&i| &classified[i].category)
        .min_by_key(|category| (rank_in(category_order, category), category.name().to_string()))
        .cloned()
        .unwrap_or_else(Category::other);

    let mut contributors = BTreeSet::new();
    let mut pull_requests = BTreeSet::new();
    let mut linked_issues = BTreeSet::new();
    for &i in members {
        let pr = &classified[i].pull_request;
        contributors.extend(pr.author.iter().cloned());
        pull_requests.insert(pr.number);
        linked_issues.extend(pr.linked_issues.iter().copied());
    }

    ChangelogEntry {
        title: display_title(&lead.title),
        category,
        contributors,
        pull_requests,
        linked_issues,
    }
}
