//! The pre-generated jobs document: `{ "lastUpdate": ..., "jobs": [...] }`.
//!
//! Loaded once from a file or fetched once over HTTP. A failed load is
//! reported to the caller; no retry is attempted.

use super::posting::JobPosting;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Feed loading errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("cannot read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
    #[error("malformed jobs feed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFeed {
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

impl JobFeed {
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, FeedError> {
        let data = fs::read_to_string(path).map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// Single HTTP GET of the feed.
    pub fn fetch(url: &str) -> Result<Self, FeedError> {
        let network = |message: String| FeedError::Network {
            url: url.to_string(),
            message,
        };
        let body = ureq::get(url)
            .set("User-Agent", concat!("jobmap/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .call()
            .map_err(|e| network(e.to_string()))?
            .into_string()
            .map_err(|e| network(e.to_string()))?;
        Self::from_json(&body)
    }

    /// Fetch if `source` is an http(s) URL, otherwise read it as a path.
    pub fn load(source: &str) -> Result<Self, FeedError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::fetch(source)
        } else {
            Self::load_from(Path::new(source))
        }
    }

    /// `lastUpdate` as a timestamp, when it parses as RFC 3339.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_update
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
