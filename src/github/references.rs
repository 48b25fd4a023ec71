use std::collections::BTreeSet;

use crate::models::RepoSlug;

const CLOSING_KEYWORDS: &[&str] = &[
    "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves", "resolved",
];

/// Issue numbers a pull request body closes via GitHub closing keywords, e.g.
/// `Fixes #12`, `closes: owner/repo#3` or `Resolves https://github.com/owner/repo/issues/9`.
///
/// References into other repositories are ignored.
pub fn closing_issue_references(body: &str, repo: &RepoSlug) -> BTreeSet<u64> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let mut issues = BTreeSet::new();

    for pair in tokens.windows(2) {
        if is_closing_keyword(pair[0]) {
            if let Some(number) = parse_reference(pair[1], repo) {
                issues.insert(number);
            }
        }
    }

    issues
}

fn is_closing_keyword(token: &str) -> bool {
    let word = token
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(':')
        .to_lowercase();
    CLOSING_KEYWORDS.contains(&word.as_str())
}

fn parse_reference(token: &str, repo: &RepoSlug) -> Option<u64> {
    let token = token.trim_matches(|c: char| matches!(c, ',' | '.' | ';' | '!' | '(' | ')' | '[' | ']'));

    let number = if let Some(rest) = token.strip_prefix('#') {
        rest
    } else if let Some((full_name, rest)) = token.split_once('#') {
        if !repo.matches(full_name) {
            return None;
        }
        rest
    } else {
        let path = token
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .strip_prefix("github.com/")?;
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            [owner, name, "issues" | "pull", number]
                if repo.matches(&format!("{}/{}", owner, name)) =>
            {
                *number
            }
            _ => return None,
        }
    };

    number.parse::<u64>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(body: &str) -> Vec<u64> {
        closing_issue_references(body, &RepoSlug::new("acme", "widgets"))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(refs("Fixes #12"), vec![12]);
        assert_eq!(refs("This closes #3 and resolves #4."), vec![3, 4]);
        assert_eq!(refs("FIXED: #7"), vec![7]);
        assert_eq!(refs("(fixes #8)"), vec![8]);
    }

    #[test]
    fn test_mentions_without_keyword_ignored() {
        assert!(refs("Related to #12, see also #13").is_empty());
        assert!(refs("fixes the bug").is_empty());
        assert!(refs("fixes #0").is_empty());
    }

    #[test]
    fn test_qualified_references() {
        assert_eq!(refs("Fixes acme/widgets#5"), vec![5]);
        assert!(refs("Fixes other/repo#5").is_empty());
        assert_eq!(refs("Closes https://github.com/acme/widgets/issues/9"), vec![9]);
        assert!(refs("Closes https://github.com/other/repo/issues/9").is_empty());
    }
}
