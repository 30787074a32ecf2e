//! Error type for Imgur API queries and cache refreshes.

use std::panic::Location;

use thiserror::Error;

/// Errors raised while querying the Imgur API or refreshing a record.
///
/// Failures are never retried here; each one aborts the refresh of a single
/// record and leaves that record unmodified. Whether a failed ID aborts the
/// whole build is the caller's decision.
#[derive(Debug, Error)]
pub enum ImgurError {
    #[error("timed out waiting for reply from {url}: {source}")]
    Timeout { url: String, source: reqwest::Error },

    #[error("unable to connect to {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse JSON from {url}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("query unsuccessful from {url}: {error}")]
    Api { url: String, error: String },

    #[error("unexpected JSON for {imgur_id} at {path}: {source}")]
    UnexpectedData {
        imgur_id: String,
        path: String,
        source: serde_json::Error,
    },
}

impl ImgurError {
    /// Log this error once at warning level, tagged with the raising call
    /// site, and hand it back for propagation.
    ///
    /// Every `ImgurError` returned by this crate has passed through here, so
    /// callers never need to re-log on catch.
    #[track_caller]
    pub(crate) fn raise(self) -> Self {
        let caller = Location::caller();
        let location = format!("{}:{}", caller.file(), caller.line());
        tracing::warn!(location = %location, "{self}");
        self
    }
}
