use crate::analysis::classifier::classify_all;
use crate::analysis::deduplicator::deduplicate;
use crate::analysis::selector::select;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::PullRequestSource;
use crate::models::{Changelog, ChangelogEntry, PullRequest, ResolvedBoundary, VersionBoundary};

/// Select, classify and merge an already fetched pull request list.
///
/// Pure: the same pull requests (in any order) and config always give the same
/// entries.
pub fn build_entries(
    pull_requests: &[PullRequest],
    boundary: &ResolvedBoundary,
    config: &PipelineConfig,
) -> Vec<ChangelogEntry> {
    let selected = select(pull_requests, boundary, &config.selection);
    let classified = classify_all(selected, config.taxonomy.rules());
    deduplicate(classified, config.taxonomy.order())
}

pub struct ChangelogPipeline<S> {
    source: S,
    config: PipelineConfig,
}

impl<S: PullRequestSource> ChangelogPipeline<S> {
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Self { source, config }
    }

    pub async fn generate(&self, boundary: &VersionBoundary) -> Result<Changelog> {
        // Step 1: Resolve both ends of the window
        tracing::info!("Resolving {} via {}", boundary, self.source.name());
        let resolved = boundary.resolve(&self.source).await?;

        // Step 2: Fetch everything that may have merged inside it
        let pull_requests = self.source.closed_pull_requests(resolved.start).await?;

        // Step 3: Select, classify, merge
        let entries = build_entries(&pull_requests, &resolved, &self.config);
        tracing::info!(
            "{} changelog entries from {} pull requests",
            entries.len(),
            pull_requests.len()
        );

        Ok(Changelog {
            boundary: resolved,
            entries,
            category_order: self.config.taxonomy.order().to_vec(),
        })
    }
}
