use globset::{GlobBuilder, GlobMatcher};

use crate::error::{Error, Result};

/// A case-insensitive glob over label names.
///
/// `bug` matches only `bug` (or `BUG`), `type: *` matches every `type:` label and
/// `*breaking*` matches any label containing `breaking`.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    raw: String,
    matcher: GlobMatcher,
}

impl LabelPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let raw = pattern.trim();
        if raw.is_empty() {
            return Err(Error::Config("Label patterns must not be empty".to_string()));
        }

        let glob = GlobBuilder::new(raw)
            .case_insensitive(true)
            .literal_separator(false)
            .build()
            .map_err(|e| Error::Config(format!("Invalid label pattern '{}': {}", raw, e)))?;

        Ok(Self {
            raw: raw.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, label: &str) -> bool {
        self.matcher.is_match(label.trim())
    }

    pub fn matches_any<'a>(&self, labels: impl IntoIterator<Item = &'a String>) -> bool {
        labels.into_iter().any(|label| self.matches(label))
    }
}

// Two patterns are the same when built from the same text.
impl PartialEq for LabelPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for LabelPattern {}

impl std::fmt::Display for LabelPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
