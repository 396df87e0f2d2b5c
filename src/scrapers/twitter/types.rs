//! Response models of the Twitter v1.1 search and timeline endpoints.

use crate::error::ScrapeError;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// Layout of `created_at` in v1.1 payloads, e.g. `Wed Mar 31 12:34:56 +0000 2021`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Status>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub id: u64,
    pub created_at: String,
    /// Present with `tweet_mode=extended`.
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Status {
    /// The untruncated text when available.
    pub fn body(&self) -> &str {
        self.full_text
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }

    /// Creation time in UTC.
    pub fn created_at_utc(&self) -> Result<NaiveDateTime, ScrapeError> {
        DateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT)
            .map(|dt| dt.naive_utc())
            .map_err(|e| ScrapeError::Parse(format!("bad created_at {:?}: {e}", self.created_at)))
    }
}
