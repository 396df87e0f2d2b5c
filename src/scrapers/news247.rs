//! news247.gr topic listing scraper.
//!
//! Topic pages are paginated as `https://www.news247.gr/{topic}?pages={n}`.
//! Every listed article is a `div.article__summary` whose second child
//! element holds the summary text and whose third holds a Greek date such as
//! `31 Μαρτίου 2021 12:34`.
//!
//! # Assumptions
//!
//! Listings are assumed to be append-only, so the first page without any
//! article ends the scrape: later pages are never requested. If the site ever
//! serves an empty page in the middle of a listing, the rest is silently
//! skipped.
//!
//! A listing page answered with a 4xx status (other than 401, 403 and 429)
//! counts as an empty page, since the site serves its error page for topics
//! and page numbers it does not know.

use crate::error::ScrapeError;
use crate::models::{Record, ScrapeReport};
use crate::outputs::csv::{output_path, write_records};
use crate::scrapers::fetch_page;
use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.news247.gr";
pub const DEFAULT_PAGES: u32 = 20;
const SOURCE: &str = "news247";

static MONTH_WORD: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"[\p{Greek}A-Za-z]+").expect("valid month regex"));

/// Greek genitive month names as printed by the site.
const GREEK_MONTHS: [(&str, &str); 12] = [
    ("Ιανουαρίου", "Jan"),
    ("Φεβρουαρίου", "Feb"),
    ("Μαρτίου", "Mar"),
    ("Απριλίου", "Apr"),
    ("Μαΐου", "May"),
    ("Ιουνίου", "Jun"),
    ("Ιουλίου", "Jul"),
    ("Αυγούστου", "Aug"),
    ("Σεπτεμβρίου", "Sep"),
    ("Οκτωβρίου", "Oct"),
    ("Νοεμβρίου", "Nov"),
    ("Δεκεμβρίου", "Dec"),
];

#[derive(Debug, Clone)]
pub struct News247Options {
    pub base_url: String,
    pub topic: String,
    /// Upper bound on the number of listing pages requested.
    pub pages: u32,
    pub output_dir: PathBuf,
}

impl News247Options {
    pub fn new(topic: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            topic: topic.into(),
            pages: DEFAULT_PAGES,
            output_dir: output_dir.into(),
        }
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/{}?pages={}",
            self.base_url.trim_end_matches('/'),
            self.topic,
            page
        )
    }
}

/// Scrape up to `opts.pages` listing pages and write everything found once at the end.
///
/// Nothing is written when no article was found. A 4xx answer for a listing
/// page ends the listing like an empty page does, and what was collected so
/// far is still written. Any other fetch or parse error aborts the run.
#[instrument(level = "info", skip_all, fields(topic = %opts.topic, pages = opts.pages))]
pub async fn scrape(client: &Client, opts: &News247Options) -> Result<ScrapeReport, ScrapeError> {
    let started = Local::now().naive_local();
    let mut report = ScrapeReport::default();

    for page in 1..=opts.pages {
        let url = opts.page_url(page);
        let fetched = fetch_page(client, &url).await;
        report.requests += 1;
        let html = match fetched {
            Ok(html) => html,
            Err(ScrapeError::Status { status, .. }) if status.is_client_error() => {
                warn!(
                    page,
                    %status,
                    "Listing page rejected; treating it as the end of the listing"
                );
                break;
            }
            Err(e) => return Err(e),
        };

        let records = parse_listing(&html)?;
        if records.is_empty() {
            info!(page, "Empty listing page; assuming no further pages");
            break;
        }
        info!(page, count = records.len(), "Parsed listing page");
        report.records.extend(records);
    }

    if !report.records.is_empty() {
        let path = output_path(&opts.output_dir, &opts.topic, SOURCE, started);
        write_records(&path, &report.records).await?;
        report.output = Some(path);
    }

    info!(
        count = report.records.len(),
        requests = report.requests,
        "news247 scrape complete"
    );
    Ok(report)
}

/// Extract every article summary on one listing page.
pub fn parse_listing(html: &str) -> Result<Vec<Record>, ScrapeError> {
    let document = Html::parse_document(html);
    let summary_selector = Selector::parse("div.article__summary")
        .map_err(|e| ScrapeError::Parse(e.to_string()))?;

    let mut records = Vec::new();
    for summary in document.select(&summary_selector) {
        let children: Vec<ElementRef> = summary.children().filter_map(ElementRef::wrap).collect();
        let text = child_text(&children, 1)?;
        let date_text = child_text(&children, 2)?;
        let date = to_datetime(&date_text)?;
        debug!(%date, "Parsed article summary");
        records.push(Record::new(date, text));
    }
    Ok(records)
}

fn child_text(children: &[ElementRef], index: usize) -> Result<String, ScrapeError> {
    children
        .get(index)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| {
            ScrapeError::Parse(format!(
                "article summary has {} child elements, expected at least {}",
                children.len(),
                index + 1
            ))
        })
}

/// Parse a date such as `31 Μαρτίου 2021 12:34`.
///
/// The Greek month name is swapped for its English abbreviation before
/// parsing with `%d %b %Y %H:%M`.
pub fn to_datetime(date_string: &str) -> Result<NaiveDateTime, ScrapeError> {
    let normalized = date_string.split_whitespace().collect::<Vec<_>>().join(" ");
    let greek_month = MONTH_WORD
        .find(&normalized)
        .ok_or_else(|| ScrapeError::Parse(format!("no month name in {date_string:?}")))?
        .as_str();
    let english = GREEK_MONTHS
        .iter()
        .find(|(greek, _)| *greek == greek_month)
        .map(|(_, english)| *english)
        .ok_or_else(|| ScrapeError::Parse(format!("unknown month {greek_month:?}")))?;

    let translated = normalized.replacen(greek_month, english, 1);
    NaiveDateTime::parse_from_str(&translated, "%d %b %Y %H:%M")
        .map_err(|e| ScrapeError::Parse(format!("bad date {date_string:?}: {e}")))
}
