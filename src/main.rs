//! # Greek News Scraper
//!
//! Collects dated headlines, article summaries and tweets about a topic and
//! writes them to pipe-delimited files, one file per run.
//!
//! ## Sources
//!
//! - **news247.gr**: topic listing pages, until the first empty page
//! - **newsbeast.gr**: tag pages, output rewritten after every page
//! - **Twitter**: v1.1 search and timeline APIs, two strategies
//!
//! ## Usage
//!
//! ```sh
//! greek_news_scraper news247 dimitris-lignadis
//! greek_news_scraper newsbeast --strict
//! greek_news_scraper twitter cursor '#lignadis'
//! greek_news_scraper twitter keywords --credentials twitter-credentials.yaml
//! ```
//!
//! ## Architecture
//!
//! Every source is one linear pipeline:
//! 1. **Fetching**: sequential GET requests, one per page, account or hashtag
//! 2. **Parsing**: fixed selectors or JSON fields, dates normalized with `chrono`
//! 3. **Output**: a `date|text` file named `{topic}_{source}_{YYYY-MM-DD_HH:MM}.csv`

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::{Cli, Command, TwitterMethod};
use config::{CURSOR_CREDENTIALS_FILE, KEYWORD_CREDENTIALS_FILE, Settings};
use models::ScrapeReport;
use scrapers::news247::News247Options;
use scrapers::newsbeast::NewsbeastOptions;
use scrapers::twitter::{CursorOptions, KeywordOptions};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("greek_news_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = Client::new();
    let output_dir = args.output_dir.clone();

    let report: ScrapeReport = match args.command {
        Command::News247(cmd) => {
            let mut opts = News247Options::new(cmd.topic, output_dir);
            opts.base_url = cmd.base_url;
            opts.pages = cmd.pages;
            scrapers::news247::scrape(&client, &opts).await?
        }
        Command::Newsbeast(cmd) => {
            let mut opts = NewsbeastOptions::new(output_dir);
            opts.base_url = cmd.base_url;
            opts.topic = cmd.topic;
            opts.pages = cmd.pages;
            opts.strict = cmd.strict;
            scrapers::newsbeast::scrape(&client, &opts).await?
        }
        Command::Twitter(cmd) => match cmd.method {
            TwitterMethod::Cursor => {
                let opts = CursorOptions {
                    base_url: cmd.base_url,
                    hashtag: cmd.hashtag.ok_or("the cursor method needs a hashtag")?,
                    limit: cmd.limit,
                    credentials_path: cmd
                        .credentials
                        .unwrap_or_else(|| PathBuf::from(CURSOR_CREDENTIALS_FILE)),
                    output_dir,
                };
                scrapers::twitter::scrape_cursor(&client, &opts).await?
            }
            TwitterMethod::Keywords => {
                let settings = Settings::load(args.config.as_deref())?;
                let opts = KeywordOptions {
                    base_url: cmd.base_url,
                    settings: settings.keywords,
                    credentials_path: cmd
                        .credentials
                        .unwrap_or_else(|| PathBuf::from(KEYWORD_CREDENTIALS_FILE)),
                    output_dir,
                };
                scrapers::twitter::scrape_keywords(&client, &opts).await?
            }
        },
    };

    let elapsed = start_time.elapsed();
    info!(
        records = report.records.len(),
        requests = report.requests,
        output = ?report.output,
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
