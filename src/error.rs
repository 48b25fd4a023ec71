use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not resolve boundary reference '{0}' in repository history")]
    BoundaryResolution(String),

    #[error("Invalid boundary: start '{start}' resolves after end '{end}'")]
    InvalidBoundary { start: String, end: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure class, used by the CLI to pick an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    BoundaryResolution,
    Fetch,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) | Error::InvalidBoundary { .. } | Error::Toml(_) => {
                ErrorKind::Configuration
            }
            Error::BoundaryResolution(_) => ErrorKind::BoundaryResolution,
            Error::GitHubApi(_)
            | Error::RateLimited(_)
            | Error::Network(_)
            | Error::Serialization(_)
            | Error::RepoNotFound(_)
            | Error::InvalidHeader(_) => ErrorKind::Fetch,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::BoundaryResolution("v9.9.9".into()).kind(),
            ErrorKind::BoundaryResolution
        );
        assert_eq!(Error::Config("bad".into()).kind(), ErrorKind::Configuration);
        assert_eq!(
            Error::InvalidBoundary {
                start: "v2".into(),
                end: "v1".into()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(Error::RateLimited(30).kind(), ErrorKind::Fetch);
    }

    #[test]
    fn test_boundary_error_names_reference() {
        let err = Error::BoundaryResolution("v9.9.9".into());
        assert!(err.to_string().contains("'v9.9.9'"));
    }
}
