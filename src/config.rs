use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::path::Path;

use crate::analysis::SelectionRules;
use crate::error::{Error, Result};
use crate::models::Category;
use crate::taxonomy::{CategoryRule, CategoryTaxonomy, LabelPattern};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CONFIG_FILE: &str = ".changelog.toml";

/// Connection settings read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_url: String,
    pub per_page: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());
        if github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set, using unauthenticated requests");
        }

        let api_url = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "GITHUB_API_URL must be an http(s) URL, got '{}'",
                api_url
            )));
        }

        let per_page = env::var("CHANGELOG_PER_PAGE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(100)
            .clamp(1, 100);

        Ok(Self {
            github_token,
            api_url,
            per_page,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            per_page: 100,
        }
    }
}

/// The changelog rules file (`.changelog.toml`).
///
/// ```toml
/// exclude_labels = ["duplicate", "wontfix"]
/// category_order = ["Breaking Changes", "Features", "Fixes", "Other"]
///
/// [[rules]]
/// label = "breaking*"
/// category = "Breaking Changes"
/// ```
///
/// Rules are tried in file order and the first matching one decides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChangelogConfig {
    pub exclude_labels: Vec<String>,
    pub base_branch: Option<String>,
    pub category_order: Vec<String>,
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub label: String,
    pub category: String,
}

impl ChangelogConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        tracing::info!("Loaded changelog config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Loads `explicit` when given, otherwise `.changelog.toml` from `dir` if it
    /// exists, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        tracing::debug!("No changelog config found, using defaults");
        Ok(Self::default())
    }

    pub fn taxonomy(&self) -> Result<CategoryTaxonomy> {
        let order = self
            .category_order
            .iter()
            .map(|name| Category::new(name.trim()))
            .collect();
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let pattern = LabelPattern::new(&rule.label).map_err(|e| match e {
                    Error::Config(msg) => Error::Config(format!("Rule {}: {}", index + 1, msg)),
                    other => other,
                })?;
                Ok(CategoryRule::new(pattern, Category::new(rule.category.trim())))
            })
            .collect::<Result<Vec<_>>>()?;

        CategoryTaxonomy::new(order, rules)
    }

    pub fn selection_rules(&self) -> Result<SelectionRules> {
        let exclude_labels = self
            .exclude_labels
            .iter()
            .map(|label| LabelPattern::new(label))
            .collect::<Result<Vec<_>>>()?;

        let base_branch = self
            .base_branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        Ok(SelectionRules {
            exclude_labels,
            base_branch,
            skip_pull_requests: BTreeSet::new(),
        })
    }
}

/// Validated settings the changelog pipeline runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub taxonomy: CategoryTaxonomy,
    pub selection: SelectionRules,
}

impl TryFrom<&ChangelogConfig> for PipelineConfig {
    type Error = Error;

    fn try_from(config: &ChangelogConfig) -> Result<Self> {
        Ok(Self {
            taxonomy: config.taxonomy()?,
            selection: config.selection_rules()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
exclude_labels = ["duplicate", "wontfix"]
base_branch = "main"
category_order = ["Breaking Changes", "Features", "Fixes"]

[[rules]]
label = "breaking*"
category = "Breaking Changes"

[[rules]]
label = "feature"
category = "Features"

[[rules]]
label = "bug"
category = "Fixes"
"#;

    #[test]
    fn test_parse_sample() {
        let config = ChangelogConfig::from_toml(SAMPLE).unwrap();
        let pipeline = PipelineConfig::try_from(&config).unwrap();

        let names: Vec<_> = pipeline.taxonomy.order().iter().map(Category::name).collect();
        assert_eq!(names, vec!["Breaking Changes", "Features", "Fixes", "Other"]);
        assert_eq!(pipeline.taxonomy.rules().len(), 3);
        assert_eq!(pipeline.taxonomy.rules()[0].pattern.as_str(), "breaking*");
        assert_eq!(pipeline.selection.exclude_labels.len(), 2);
        assert_eq!(pipeline.selection.base_branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_missing_config_defaults() {
        let config = ChangelogConfig::from_toml("").unwrap();
        let pipeline = PipelineConfig::try_from(&config).unwrap();
        assert_eq!(pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_rules_without_order_rejected() {
        let config = ChangelogConfig::from_toml(
            r#"
[[rules]]
label = "bug"
category = "Fixes"
"#,
        )
        .unwrap();
        assert!(matches!(
            PipelineConfig::try_from(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_glob_rejected_before_fetching() {
        let config = ChangelogConfig::from_toml(
            r#"
category_order = ["Fixes"]

[[rules]]
label = "bug["
category = "Fixes"
"#,
        )
        .unwrap();
        let err = PipelineConfig::try_from(&config).unwrap_err();
        assert!(err.to_string().contains("Rule 1"));

        let config = ChangelogConfig::from_toml(r#"exclude_labels = ["{wontfix"]"#).unwrap();
        assert!(matches!(
            PipelineConfig::try_from(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = ChangelogConfig::from_toml("exclude = [\"x\"]").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        let found = ChangelogConfig::discover(None, dir.path()).unwrap();
        assert_eq!(found, ChangelogConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), SAMPLE).unwrap();
        let found = ChangelogConfig::discover(None, dir.path()).unwrap();
        assert_eq!(found.rules.len(), 3);

        let missing = dir.path().join("missing.toml");
        assert!(ChangelogConfig::discover(Some(&missing), dir.path()).is_err());
    }
}
