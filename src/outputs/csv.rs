//! Pipe-delimited output files.
//!
//! Every pipeline ends here. Files are named after the topic, the source and
//! the minute the run started:
//!
//! ```text
//! output_dir/
//! ├── dimitris-lignadis_newsbeast_2021-03-31_12:34.csv
//! └── #lignadis_tweets_2021-03-31_12:40.csv
//! ```
//!
//! The first row is always the `date|text` header.

use crate::error::ScrapeError;
use crate::models::Record;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Column delimiter.
pub const DELIMITER: u8 = b'|';

/// Build `{topic}_{source}_{YYYY-MM-DD_HH:MM}.csv`.
pub fn output_filename(topic: &str, source: &str, now: NaiveDateTime) -> String {
    format!("{}_{}_{}.csv", topic, source, now.format("%Y-%m-%d_%H:%M"))
}

/// Full path of the output file inside `output_dir`.
pub fn output_path(output_dir: &Path, topic: &str, source: &str, now: NaiveDateTime) -> PathBuf {
    output_dir.join(output_filename(topic, source, now))
}

/// Encode records as pipe-delimited text with a header row.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break.
pub fn encode_records(records: &[Record]) -> Result<Vec<u8>, ScrapeError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(DELIMITER)
        .from_writer(Vec::new());
    wtr.write_record(["date", "text"])?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.into_inner()
        .map_err(|e| ScrapeError::Csv(e.into_error().into()))
}

/// Write `records` to `path`, replacing whatever was there.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_records(path: &Path, records: &[Record]) -> Result<(), ScrapeError> {
    let bytes = encode_records(records)?;
    fs::write(path, bytes).await.map_err(|source| ScrapeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote records");
    Ok(())
}
