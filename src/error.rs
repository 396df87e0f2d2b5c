//! Error taxonomy shared by every scraping pipeline.
//!
//! Failures fall in four families: transport problems talking to a site or
//! API, missing or malformed credentials, markup/payload that does not look
//! the way the parsers expect, and upstream rejection (authentication or rate
//! limiting). Nothing in the crate retries; [`ScrapeError::is_transient`] lets
//! a caller decide whether trying again could help.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("authentication rejected by {url} ({status}): {message}")]
    Auth {
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error("rate limited by {url}")]
    RateLimited { url: String },
    #[error("unexpected markup: {0}")]
    Parse(String),
    #[error("cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("credentials file {path}: {message}")]
    Credentials { path: PathBuf, message: String },
    #[error("settings file {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("page {page} repeats page 1; the listing has fewer pages than requested")]
    PageOutOfRange { page: u32 },
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Build the error for a non-success HTTP status.
    pub fn from_status(url: &str, status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ScrapeError::Auth {
                url: url.to_string(),
                status,
                message: body.trim().to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => ScrapeError::RateLimited {
                url: url.to_string(),
            },
            _ => ScrapeError::Status {
                url: url.to_string(),
                status,
            },
        }
    }

    /// True for failures that may go away on their own: network errors,
    /// 5xx responses and rate limiting. Parse, credential and auth failures
    /// are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Transport { .. } | ScrapeError::RateLimited { .. } => true,
            ScrapeError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
