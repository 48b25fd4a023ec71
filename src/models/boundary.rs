use chrono::{DateTime, NaiveDate, Timelike, Utc};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::github::PullRequestSource;

/// One end of a release window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryRef {
    /// A tag or any other named ref the hosting API can resolve, such as a branch.
    Tag(String),
    Commit(String),
    Timestamp(DateTime<Utc>),
    /// Open end of an unreleased range: everything merged up to the moment of
    /// resolution. Written as `HEAD`.
    Now,
}

impl BoundaryRef {
    pub async fn resolve<S>(&self, source: &S) -> Result<DateTime<Utc>>
    where
        S: PullRequestSource + ?Sized,
    {
        match self {
            BoundaryRef::Timestamp(at) => Ok(*at),
            BoundaryRef::Now => Ok(Utc::now()),
            BoundaryRef::Tag(name) | BoundaryRef::Commit(name) => source.resolve_ref(name).await,
        }
    }
}

impl FromStr for BoundaryRef {
    type Err = Error;

    /// Dates (`2024-01-31` or RFC 3339) become timestamps, 7-40 hex digits a
    /// commit, `HEAD` the open end, anything else a tag. The text is kept
    /// exactly as given.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Config("Boundary reference must not be empty".to_string()));
        }

        if s == "HEAD" {
            return Ok(BoundaryRef::Now);
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Ok(BoundaryRef::Timestamp(at.with_timezone(&Utc)));
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(BoundaryRef::Timestamp(midnight.and_utc()));
            }
        }
        if (7..=40).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(BoundaryRef::Commit(s.to_string()));
        }

        Ok(BoundaryRef::Tag(s.to_string()))
    }
}

impl std::fmt::Display for BoundaryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryRef::Tag(name) => write!(f, "{}", name),
            BoundaryRef::Now => write!(f, "HEAD"),
            // Only full SHAs are abbreviated; shorter text is shown as typed.
            BoundaryRef::Commit(sha) if sha.len() == 40 && sha.is_ascii() => write!(f, "{}", &sha[..7]),
            BoundaryRef::Commit(sha) => write!(f, "{}", sha),
            BoundaryRef::Timestamp(at) => {
                if at.num_seconds_from_midnight() == 0 && at.nanosecond() == 0 {
                    write!(f, "{}", at.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", at.format("%Y-%m-%dT%H:%M:%SZ"))
                }
            }
        }
    }
}

/// The `[start, end)` window of merged pull requests one changelog covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBoundary {
    pub start: BoundaryRef,
    pub end: BoundaryRef,
}

impl VersionBoundary {
    pub fn new(start: BoundaryRef, end: BoundaryRef) -> Self {
        Self { start, end }
    }

    /// Resolves both endpoints concurrently against the repository history.
    pub async fn resolve<S>(&self, source: &S) -> Result<ResolvedBoundary>
    where
        S: PullRequestSource + ?Sized,
    {
        let (start, end) =
            futures::try_join!(self.start.resolve(source), self.end.resolve(source))?;
        tracing::debug!("Resolved {} to {} .. {}", self, start, end);
        ResolvedBoundary::new(self.clone(), start, end)
    }
}

impl std::fmt::Display for VersionBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBoundary {
    pub boundary: VersionBoundary,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ResolvedBoundary {
    /// Fails with `InvalidBoundary` when `start` lies after `end`. Equal
    /// endpoints are accepted and describe an empty window.
    pub fn new(boundary: VersionBoundary, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidBoundary {
                start: boundary.start.to_string(),
                end: boundary.end.to_string(),
            });
        }
        Ok(Self {
            boundary,
            start,
            end,
        })
    }

    pub fn from_timestamps(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let boundary =
            VersionBoundary::new(BoundaryRef::Timestamp(start), BoundaryRef::Timestamp(end));
        Self::new(boundary, start, end)
    }

    /// Start inclusive, end exclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}
