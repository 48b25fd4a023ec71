use crate::models::{Category, ClassifiedPullRequest, PullRequest};
use crate::taxonomy::CategoryRule;

/// Returns the category of the first rule matching any of the pull request's
/// labels, or `Other` when none does.
pub fn classify(pull_request: &PullRequest, rules: &[CategoryRule]) -> Category {
    rules
        .iter()
        .find(|rule| rule.matches(&pull_request.labels))
        .map(|rule| rule.category.clone())
        .unwrap_or_else(Category::other)
}

pub fn classify_all(
    pull_requests: Vec<PullRequest>,
    rules: &[CategoryRule],
) -> Vec<ClassifiedPullRequest> {
    pull_requests
        .into_iter()
        .map(|pull_request| {
            let category = classify(&pull_request, rules);
            ClassifiedPullRequest {
                pull_request,
                category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::LabelPattern;

    fn rules() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new(
                LabelPattern::new("breaking").unwrap(),
                Category::new("Breaking Changes"),
            ),
            CategoryRule::new(LabelPattern::new("feature").unwrap(), Category::new("Features")),
            CategoryRule::new(LabelPattern::new("*bug*").unwrap(), Category::new("Fixes")),
        ]
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Label order on the PR is irrelevant; rule order decides.
        let pr = PullRequest::new(1, "x").with_label("bug").with_label("feature");
        assert_eq!(classify(&pr, &rules()), Category::new("Features"));

        let pr = PullRequest::new(2, "x").with_label("feature").with_label("breaking");
        assert_eq!(classify(&pr, &rules()), Category::new("Breaking Changes"));
    }

    #[test]
    fn test_unmatched_and_unlabelled_fall_back_to_other() {
        let pr = PullRequest::new(1, "x").with_label("dependencies");
        assert_eq!(classify(&pr, &rules()), Category::other());

        let pr = PullRequest::new(2, "x");
        assert_eq!(classify(&pr, &rules()), Category::other());
        assert_eq!(classify(&pr, &[]), Category::other());
    }

    #[test]
    fn test_classify_all_keeps_every_pull_request() {
        let prs = vec![
            PullRequest::new(1, "a").with_label("ui-bug"),
            PullRequest::new(2, "b"),
        ];
        let classified = classify_all(prs, &rules());
        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].category, Category::new("Fixes"));
        assert_eq!(classified[1].category, Category::other());
    }
}
