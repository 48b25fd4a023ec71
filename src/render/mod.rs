pub mod existing;
mod json;
mod markdown;
mod text;

use serde::Serialize;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{Category, Changelog, ChangelogEntry, RepoSlug};
use crate::taxonomy::rank_in;

pub use existing::{insert_release, referenced_pull_requests, release_heading, remove_release};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!(
                "Unknown output format '{}' (expected markdown, text or json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Turns `#N` references into links when set (Markdown only).
    pub repository: Option<RepoSlug>,
}

/// One non-empty category with its entries in display order.
#[derive(Debug, Serialize)]
pub struct Section<'a> {
    pub category: &'a Category,
    pub entries: Vec<&'a ChangelogEntry>,
}

/// Groups entries by category following the changelog's category order.
/// Empty categories are left out; categories missing from the order come last,
/// by name. Entries are sorted by lowest pull request number, then title.
pub fn sections(changelog: &Changelog) -> Vec<Section<'_>> {
    let order = &changelog.category_order;

    let mut categories: Vec<&Category> = changelog.entries.iter().map(|e| &e.category).collect();
    categories.sort_by(|a, b| {
        rank_in(order, a)
            .cmp(&rank_in(order, b))
            .then_with(|| a.name().cmp(b.name()))
    });
    categories.dedup();

    categories
        .into_iter()
        .map(|category| {
            let mut entries: Vec<&ChangelogEntry> = changelog
                .entries
                .iter()
                .filter(|e| &e.category == category)
                .collect();
            entries.sort_by(|a, b| {
                a.first_pull_request()
                    .cmp(&b.first_pull_request())
                    .then_with(|| a.title.cmp(&b.title))
            });
            Section { category, entries }
        })
        .collect()
}

/// Renders the changelog. Performs no I/O; the same changelog always renders
/// to the same bytes.
pub fn render(changelog: &Changelog, options: &RenderOptions) -> Result<String> {
    let header = changelog.boundary.boundary.to_string();
    let sections = sections(changelog);

    match options.format {
        OutputFormat::Markdown => Ok(markdown::format_markdown(
            &header,
            &sections,
            options.repository.as_ref(),
        )),
        OutputFormat::Text => Ok(text::format_text(&header, &sections)),
        OutputFormat::Json => json::format_json(&header, changelog, &sections),
    }
}

pub(crate) const NO_CHANGES: &str = "No changes.";

/// `Title by @a, @b in #1, #2 (closes #5)`, with `link` deciding how each
/// reference is written.
pub(crate) fn entry_line(entry: &ChangelogEntry, link: impl Fn(u64, bool) -> String) -> String {
    let mut line = entry.title.clone();

    if !entry.contributors.is_empty() {
        let handles: Vec<String> = entry.contributors.iter().map(|c| format!("@{}", c)).collect();
        line.push_str(&format!(" by {}", handles.join(", ")));
    }

    let pulls: Vec<String> = entry.pull_requests.iter().map(|n| link(*n, true)).collect();
    line.push_str(&format!(" in {}", pulls.join(", ")));

    if !entry.linked_issues.is_empty() {
        let issues: Vec<String> = entry.linked_issues.iter().map(|n| link(*n, false)).collect();
        line.push_str(&format!(" (closes {})", issues.join(", ")));
    }

    line
}
