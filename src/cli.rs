//! Command-line interface definitions.
//!
//! One subcommand per source. Output location and the optional settings file
//! are global options and can also come from the environment.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # news247 topic listing, at most 20 pages
/// greek_news_scraper news247 dimitris-lignadis
///
/// # newsbeast tag pages, failing if the site starts repeating page 1
/// greek_news_scraper newsbeast --pages 16 --strict
///
/// # Twitter, one hashtag through the search cursor
/// greek_news_scraper twitter cursor '#lignadis'
///
/// # Twitter, newspaper timelines filtered by keyword plus hashtag searches
/// greek_news_scraper -o ./out twitter keywords
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory the output files are written to
    #[arg(short, long, env = "SCRAPER_OUTPUT_DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Optional path to a settings.yaml file
    #[arg(short, long, env = "SCRAPER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape a news247.gr topic listing
    News247(News247Args),
    /// Scrape newsbeast.gr tag pages
    Newsbeast(NewsbeastArgs),
    /// Collect tweets through the Twitter API
    Twitter(TwitterArgs),
}

#[derive(Args, Debug)]
pub struct News247Args {
    /// Topic slug as it appears in the site URL
    pub topic: String,

    /// Maximum number of listing pages to request
    #[arg(short, long, default_value_t = crate::scrapers::news247::DEFAULT_PAGES)]
    pub pages: u32,

    #[arg(long, default_value = crate::scrapers::news247::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Args, Debug)]
pub struct NewsbeastArgs {
    /// Tag slug as it appears in the site URL
    #[arg(short, long, default_value = crate::scrapers::newsbeast::DEFAULT_TOPIC)]
    pub topic: String,

    /// Number of tag pages to request
    #[arg(short, long, default_value_t = crate::scrapers::newsbeast::DEFAULT_PAGES)]
    pub pages: u32,

    /// Fail instead of recording duplicates when a page repeats page 1
    #[arg(long)]
    pub strict: bool,

    #[arg(long, default_value = crate::scrapers::newsbeast::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(Args, Debug)]
pub struct TwitterArgs {
    /// Extraction strategy
    #[arg(value_enum)]
    pub method: TwitterMethod,

    /// Hashtag to search (required by `cursor`)
    #[arg(required_if_eq("method", "cursor"))]
    pub hashtag: Option<String>,

    /// Credentials file; defaults depend on the strategy
    #[arg(long, env = "TWITTER_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Maximum number of tweets collected by `cursor`
    #[arg(short, long, default_value_t = crate::scrapers::twitter::DEFAULT_LIMIT)]
    pub limit: usize,

    #[arg(long, default_value = crate::scrapers::twitter::DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwitterMethod {
    /// Page through the search results of one hashtag
    Cursor,
    /// Filter newspaper timelines by keyword and add hashtag searches
    Keywords,
}
