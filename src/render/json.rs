use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Section;
use crate::error::Result;
use crate::models::Changelog;

#[derive(Serialize)]
struct JsonChangelog<'a> {
    range: &'a str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    sections: &'a [Section<'a>],
}

pub(super) fn format_json(header: &str, changelog: &Changelog, sections: &[Section]) -> Result<String> {
    let document = JsonChangelog {
        range: header,
        start: changelog.boundary.start,
        end: changelog.boundary.end,
        sections,
    };
    let mut output = serde_json::to_string_pretty(&document)?;
    output.push('\n');
    Ok(output)
}
