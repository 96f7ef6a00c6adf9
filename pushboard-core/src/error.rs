//! Error types for loading and rendering a push-activity dataset
//!
//! Nothing here is retried. A `FetchError` is terminal for the whole page,
//! a `DatasetError` is terminal for the row (and, during a build, the view).

use thiserror::Error;

/// Failure to obtain or decode the dataset document.
///
/// The `Display` text is the `reason` shown to the reader as
/// `failed loading data: {reason}`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Dataset-integrity faults. These indicate a bug in whatever produced the
/// document and must never be papered over with an empty chart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("no timeline for repository {repo}")]
    MissingTimeline { repo: String },

    #[error("timeline for {repo} has {actual} entries, expected {expected}")]
    TimelineLength {
        repo: String,
        expected: usize,
        actual: usize,
    },

    #[error("repository identifier {repo:?} is not of the form owner/name")]
    MalformedRepoId { repo: String },

    #[error("year {year} is outside the supported calendar range")]
    InvalidYear { year: i32 },
}
