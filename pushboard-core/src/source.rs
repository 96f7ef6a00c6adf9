//! Loading the dataset document
//!
//! The document is fetched exactly once, from a local file or over HTTP(S).
//! Failures are not retried.

use crate::dataset::Document;
use crate::error::FetchError;
use std::fmt;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "pushboard::source";

/// Where the dataset document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Resolve a relative file path against `base`. URLs are returned unchanged.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            DataSource::File(path) if path.is_relative() => DataSource::File(base.join(path)),
            other => other,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Fetch and decode the document at `source`.
pub fn load_document(source: &DataSource) -> Result<Document, FetchError> {
    log::info!(target: LOG_TARGET, "Loading dataset from {}", source);

    let text = match source {
        DataSource::File(path) => std::fs::read_to_string(path).map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            source: e,
        })?,
        DataSource::Url(url) => fetch_url(url)?,
    };

    let document = parse_document(&text, &source.to_string())?;
    log::info!(
        target: LOG_TARGET,
        "Loaded {} rows and {} timelines",
        document.rows.len(),
        document.timelines.len()
    );
    Ok(document)
}

/// Decode a document from JSON text; `origin` names it in error messages.
pub fn parse_document(text: &str, origin: &str) -> Result<Document, FetchError> {
    serde_json::from_str(text).map_err(|e| FetchError::Json {
        origin: origin.to_string(),
        source: e,
    })
}

fn fetch_url(url: &str) -> Result<String, FetchError> {
    let http = |e| FetchError::Http {
        url: url.to_string(),
        source: e,
    };

    let response = reqwest::blocking::get(url).map_err(http)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(http)
}
