use super::existing::release_heading;
use super::{entry_line, Section, NO_CHANGES};
use crate::models::RepoSlug;

pub(super) fn format_markdown(header: &str, sections: &[Section], repo: Option<&RepoSlug>) -> String {
    let mut output = String::new();

    output.push_str(&release_heading(header));
    output.push('\n');

    if sections.is_empty() {
        output.push_str(&format!("\n{}\n", NO_CHANGES));
        return output;
    }

    for section in sections {
        output.push_str(&format!("\n### {}\n\n", section.category));
        for entry in &section.entries {
            let line = entry_line(entry, |number, is_pull| reference(repo, number, is_pull));
            output.push_str(&format!("- {}\n", line));
        }
    }

    output
}

fn reference(repo: Option<&RepoSlug>, number: u64, is_pull: bool) -> String {
    match repo {
        Some(repo) if is_pull => format!("[#{}]({})", number, repo.pull_url(number)),
        Some(repo) => format!("[#{}]({})", number, repo.issue_url(number)),
        None => format!("#{}", number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sections;
    use crate::render::tests::{changelog, entry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_markdown() {
        let mut fix = entry("Fix crash", "Fixes", &[10]);
        fix.contributors.insert("alice".to_string());
        fix.linked_issues.insert(5);
        let log = changelog(vec![fix, entry("Add widgets", "Features", &[11])]);

        let output = format_markdown("v1.0.0...v1.1.0", &sections(&log), None);
        assert_eq!(
            output,
            "## v1.0.0...v1.1.0\n\
             \n\
             ### Features\n\
             \n\
             - Add widgets in #11\n\
             \n\
             ### Fixes\n\
             \n\
             - Fix crash by @alice in #10 (closes #5)\n"
        );
    }

    #[test]
    fn test_linked_markdown() {
        let mut fix = entry("Fix crash", "Fixes", &[10]);
        fix.linked_issues.insert(5);
        let log = changelog(vec![fix]);
        let repo = RepoSlug::new("acme", "widgets");

        let output = format_markdown("a...b", &sections(&log), Some(&repo));
        assert!(output.contains(
            "- Fix crash in [#10](https://github.com/acme/widgets/pull/10) (closes [#5](https://github.com/acme/widgets/issues/5))"
        ));
    }

    #[test]
    fn test_empty_changelog() {
        let log = changelog(Vec::new());
        assert_eq!(format_markdown("a...b", &sections(&log), None), "## a...b\n\nNo changes.\n");
    }
}
