//! Error types for ghlog-github.

use chrono::NaiveDate;
use thiserror::Error;

/// All errors that can arise from GitHub activity fetching.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// HTTP failure — transport error or non-2xx status from the API.
    #[error("GitHub API request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    /// Response body could not be read or decoded as the expected JSON.
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[from] std::io::Error),

    /// The local day window could not be resolved for this date.
    #[error("cannot resolve a local day window for {date}")]
    AmbiguousDate { date: NaiveDate },
}
