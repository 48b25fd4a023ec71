//! Working with a CHANGELOG file that earlier runs already wrote to.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::models::RepoSlug;

/// The `## ` line that opens the section for one release.
pub fn release_heading(header: &str) -> String {
    format!("## {}", header)
}

/// Pull request numbers an existing changelog links to in `repo`
/// (`https://github.com/{owner}/{name}/pull/N`). Links to other repositories
/// are ignored.
pub fn referenced_pull_requests(text: &str, repo: &RepoSlug) -> BTreeSet<u64> {
    let marker = format!("{}/pull/", repo.html_url());

    let mut numbers = BTreeSet::new();
    let mut rest = text;
    while let Some(idx) = rest.find(&marker) {
        rest = &rest[idx + marker.len()..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(number) = digits.parse::<u64>() {
            numbers.insert(number);
        }
    }
    numbers
}

/// Byte range of the section opened by `heading`, up to the next `## ` line.
fn find_section(text: &str, heading: &str) -> Option<Range<usize>> {
    let heading = heading.trim_end();
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end();
        match start {
            None if content == heading => start = Some(offset),
            Some(begin) if content.starts_with("## ") => return Some(begin..offset),
            _ => {}
        }
        offset += line.len();
    }
    start.map(|begin| begin..text.len())
}

/// `text` without the section opened by `heading`.
pub fn remove_release(text: &str, heading: &str) -> String {
    match find_section(text, heading) {
        Some(range) => format!("{}{}", &text[..range.start], &text[range.end..]),
        None => text.to_string(),
    }
}

/// Writes `release` into `existing`. A section with the same heading is
/// replaced where it stands; otherwise the release goes below the file's `# `
/// title, or at the very top when the file has none. Blocks are separated by
/// one blank line.
pub fn insert_release(existing: &str, release: &str) -> String {
    let release = release.trim_end();
    let existing = existing.trim_start_matches('\n');

    let heading = release.lines().next().unwrap_or_default();
    if !heading.is_empty() {
        if let Some(range) = find_section(existing, heading) {
            let before = existing[..range.start].trim_end();
            let after = existing[range.end..].trim();
            return join_blocks(&[before, release, after]);
        }
    }

    let title_end = existing
        .lines()
        .next()
        .filter(|line| line.starts_with("# "))
        .map(|line| line.len());

    let (head, tail) = match title_end {
        Some(end) => (&existing[..end], existing[end..].trim()),
        None => ("", existing.trim()),
    };
    join_blocks(&[head, release, tail])
}

fn join_blocks(blocks: &[&str]) -> String {
    let mut output = blocks
        .iter()
        .filter(|block| !block.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n");
    output.push('\n');
    output
}
