//! Twitter scraping through the v1.1 REST API.
//!
//! Two strategies produce the same kind of output:
//!
//! - [`scrape_cursor`] pages backwards through the search results of one
//!   hashtag until an item cap is reached.
//! - [`scrape_keywords`] reads the recent timelines of a fixed set of
//!   newspaper accounts, keeps the items mentioning any keyword, and adds the
//!   search results of a fixed set of hashtags. One account or hashtag failing
//!   does not stop the run.
//!
//! Both load their credentials before the first request, so a broken
//! credentials file never results in network traffic.

pub mod client;
pub mod oauth;
pub mod types;

use crate::config::{Credentials, KeywordSettings};
use crate::error::ScrapeError;
use crate::models::{Record, ScrapeReport};
use crate::outputs::csv::{output_path, write_records};
use chrono::{Local, NaiveDateTime, Timelike};
use client::TwitterApi;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use types::Status;

pub use client::DEFAULT_BASE_URL;

/// Default item cap of the cursor strategy.
pub const DEFAULT_LIMIT: usize = 750;
/// Largest page the search endpoint serves.
const SEARCH_PAGE_SIZE: usize = 100;
const SOURCE: &str = "tweets";

#[derive(Debug, Clone)]
pub struct CursorOptions {
    pub base_url: String,
    pub hashtag: String,
    /// Maximum number of tweets collected.
    pub limit: usize,
    pub credentials_path: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct KeywordOptions {
    pub base_url: String,
    pub settings: KeywordSettings,
    pub credentials_path: PathBuf,
    pub output_dir: PathBuf,
}

/// Collect up to `opts.limit` tweets for one hashtag and write them once.
///
/// Newlines inside tweets are flattened to spaces.
#[instrument(level = "info", skip_all, fields(hashtag = %opts.hashtag, limit = opts.limit))]
pub async fn scrape_cursor(client: &Client, opts: &CursorOptions) -> Result<ScrapeReport, ScrapeError> {
    let credentials = Credentials::load(&opts.credentials_path)?;
    let api = TwitterApi::new(client.clone(), &opts.base_url, credentials)?;
    let started = Local::now().naive_local();
    let mut report = ScrapeReport::default();
    let mut max_id: Option<u64> = None;

    while report.records.len() < opts.limit {
        let wanted = (opts.limit - report.records.len()).min(SEARCH_PAGE_SIZE);
        let statuses = api.search(&opts.hashtag, wanted as u32, max_id).await?;
        report.requests += 1;
        if statuses.is_empty() {
            break;
        }

        for status in statuses.iter().take(wanted) {
            let text = status.body().replace('\n', " ");
            report.records.push(Record::new(status.created_at_utc()?, text));
        }
        info!(page = report.requests, total = report.records.len(), "Fetched search page");

        let oldest = statuses.iter().map(|s| s.id).min().unwrap_or(0);
        if oldest == 0 {
            break;
        }
        max_id = Some(oldest - 1);
    }

    let path = output_path(&opts.output_dir, &opts.hashtag, SOURCE, started);
    write_records(&path, &report.records).await?;
    report.output = Some(path);
    info!(count = report.records.len(), "Cursor scrape complete");
    Ok(report)
}

/// Filter newspaper timelines by keyword, add hashtag search results, write once.
///
/// Per-account and per-hashtag fetch failures are logged and skipped; every
/// other failure ends the run. The output is named after
/// `opts.settings.label`.
#[instrument(level = "info", skip_all, fields(label = %opts.settings.label))]
pub async fn scrape_keywords(client: &Client, opts: &KeywordOptions) -> Result<ScrapeReport, ScrapeError> {
    let credentials = Credentials::load(&opts.credentials_path)?;
    let api = TwitterApi::new(client.clone(), &opts.base_url, credentials)?;
    let settings = &opts.settings;
    let started = Local::now().naive_local();
    let mut report = ScrapeReport::default();

    for account in &settings.newspapers {
        report.requests += 1;
        let statuses = match api.user_timeline(account, settings.timeline_count).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(%account, error = %e, "Error getting tweets; skipping account");
                continue;
            }
        };

        let mut relevant = 0usize;
        for status in &statuses {
            if mentions_any(status.body(), &settings.keywords) {
                report.records.push(to_minute_record(status)?);
                relevant += 1;
            }
        }
        if relevant > 0 {
            info!(%account, count = relevant, "Scraped relevant tweets");
        }
    }

    for hashtag in &settings.hashtags {
        report.requests += 1;
        let statuses = match api.search(hashtag, settings.search_count, None).await {
            Ok(statuses) => statuses,
            Err(e) => {
                warn!(%hashtag, error = %e, "Error getting tweets; skipping hashtag");
                continue;
            }
        };
        info!(%hashtag, count = statuses.len(), "Scraped hashtag tweets");
        for status in &statuses {
            report.records.push(to_minute_record(status)?);
        }
    }

    let path = output_path(&opts.output_dir, &settings.label, SOURCE, started);
    write_records(&path, &report.records).await?;
    report.output = Some(path);
    info!(count = report.records.len(), "Keyword scrape complete");
    Ok(report)
}

/// Case-insensitive substring match against any keyword.
pub fn mentions_any(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

fn to_minute_record(status: &Status) -> Result<Record, ScrapeError> {
    let date: NaiveDateTime = status.created_at_utc()?;
    let date = date.with_second(0).unwrap_or(date);
    Ok(Record::new(date, status.body()))
}
