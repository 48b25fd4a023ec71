pub mod classifier;
pub mod deduplicator;
pub mod pipeline;
pub mod selector;

pub use classifier::{classify, classify_all};
pub use deduplicator::deduplicate;
pub use pipeline::{build_entries, ChangelogPipeline};
pub use selector::{select, SelectionRules};
