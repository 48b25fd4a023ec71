pub mod analysis;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod render;
pub mod taxonomy;

pub use analysis::{build_entries, ChangelogPipeline, SelectionRules};
pub use config::{ChangelogConfig, Config, PipelineConfig};
pub use error::{Error, ErrorKind, Result};
pub use github::{GitHubClient, PullRequestSource};
pub use models::{BoundaryRef, Changelog, ChangelogEntry, PullRequest, RepoSlug, VersionBoundary};
pub use render::{render, OutputFormat, RenderOptions};
pub use taxonomy::{CategoryRule, CategoryTaxonomy, LabelPattern};
