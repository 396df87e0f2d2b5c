//! Data models shared by the scraping pipelines.
//!
//! - [`Record`]: one dated piece of text extracted from a listing or a tweet
//! - [`ScrapeReport`]: what a single pipeline run collected and where it went

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Timestamp layout used in every output file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A dated piece of text extracted from one fetched item.
///
/// Records carry no identity beyond their position in the output; two runs
/// over the same source produce two independent sets of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// When the item was published, in the source's wall-clock time (UTC for tweets).
    #[serde(serialize_with = "serialize_timestamp")]
    pub date: NaiveDateTime,
    /// The extracted text: a summary, a headline or a tweet body.
    pub text: String,
}

impl Record {
    pub fn new(date: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            date,
            text: text.into(),
        }
    }
}

fn serialize_timestamp<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(TIMESTAMP_FORMAT))
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// Every record collected, in fetch order.
    pub records: Vec<Record>,
    /// The file the records were written to, if anything was written.
    pub output: Option<PathBuf>,
    /// Number of HTTP requests issued.
    pub requests: usize,
}
