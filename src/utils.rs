//! Small helpers for logging and file system checks.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, on a character boundary, with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and deletes an empty marker
/// file in it.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the marker file
/// cannot be written (permission denied, read-only filesystem).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // create_dir_all also succeeds on an existing read-only directory
    let marker_path = path.join(".greek_news_scraper_write_check");
    fs::write(&marker_path, b"").await?;
    if let Err(e) = fs::remove_file(&marker_path).await {
        debug!(
            error = %e,
            marker = %marker_path.display(),
            "Could not remove write-check file"
        );
    }
    info!("Output directory is writable");
    Ok(())
}
