pub mod client;
pub mod paginator;
pub mod rate_limiter;
pub mod references;
pub mod source;

pub use client::GitHubClient;
pub use paginator::Paginator;
pub use rate_limiter::RateLimiter;
pub use references::closing_issue_references;
pub use source::PullRequestSource;
