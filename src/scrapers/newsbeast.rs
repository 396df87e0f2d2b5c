//! newsbeast.gr tag page scraper.
//!
//! Tag pages live at `https://www.newsbeast.gr/tag/{topic}/page/{n}`. Each
//! article is a `div.articleDisplay`; its first child element is the title
//! and its fourth carries the publication date, which the site prints in one
//! of three ways:
//!
//! - an absolute `DD/MM/YYYY` date,
//! - a relative `N ώρες` ("N hours ago") marker,
//! - nothing at all, for items posted moments ago.
//!
//! Only the date is kept; records are stamped at midnight.
//!
//! # Out-of-range pages
//!
//! Asking for a page past the end of a tag listing does not fail: the site
//! answers with page 1 again. Every later page is compared with page 1, and a
//! repeat is either reported and kept (default) or refused with
//! [`ScrapeError::PageOutOfRange`] in strict mode.

use crate::error::ScrapeError;
use crate::models::{Record, ScrapeReport};
use crate::outputs::csv::{output_path, write_records};
use crate::scrapers::fetch_page;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.newsbeast.gr";
pub const DEFAULT_TOPIC: &str = "dimitris-lignadis";
pub const DEFAULT_PAGES: u32 = 16;
const SOURCE: &str = "newsbeast";

static ABSOLUTE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("valid date regex"));
static HOURS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) ώ").expect("valid hours regex"));

#[derive(Debug, Clone)]
pub struct NewsbeastOptions {
    pub base_url: String,
    pub topic: String,
    pub pages: u32,
    /// Fail instead of recording duplicates when the site repeats page 1.
    pub strict: bool,
    pub output_dir: PathBuf,
    /// Reference clock for relative dates and the output file name.
    pub now: NaiveDateTime,
}

impl NewsbeastOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            pages: DEFAULT_PAGES,
            strict: false,
            output_dir: output_dir.into(),
            now: Local::now().naive_local(),
        }
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/tag/{}/page/{}",
            self.base_url.trim_end_matches('/'),
            self.topic,
            page
        )
    }
}

/// Scrape the tag pages, rewriting the output file after every page.
///
/// Records from pages already written survive a failure on a later page.
#[instrument(level = "info", skip_all, fields(topic = %opts.topic, pages = opts.pages, strict = opts.strict))]
pub async fn scrape(client: &Client, opts: &NewsbeastOptions) -> Result<ScrapeReport, ScrapeError> {
    let path = output_path(&opts.output_dir, &opts.topic, SOURCE, opts.now);
    let mut report = ScrapeReport::default();
    let mut first_page_titles: Option<Vec<String>> = None;

    for page in 1..=opts.pages {
        let html = fetch_page(client, &opts.page_url(page)).await?;
        report.requests += 1;

        let records = parse_tag_page(&html, opts.now)?;
        if records.is_empty() {
            info!(page, "Empty tag page; stopping");
            break;
        }

        let titles: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
        match &first_page_titles {
            None => first_page_titles = Some(titles),
            Some(first) if *first == titles => {
                if opts.strict {
                    return Err(ScrapeError::PageOutOfRange { page });
                }
                warn!(page, "Page repeats page 1; the listing is probably shorter than requested");
            }
            Some(_) => {}
        }

        info!(page, count = records.len(), "Parsed tag page");
        report.records.extend(records);
        write_records(&path, &report.records).await?;
        report.output = Some(path.clone());
    }

    info!(
        count = report.records.len(),
        requests = report.requests,
        "newsbeast scrape complete"
    );
    Ok(report)
}

/// Extract every article on one tag page.
pub fn parse_tag_page(html: &str, now: NaiveDateTime) -> Result<Vec<Record>, ScrapeError> {
    let document = Html::parse_document(html);
    let article_selector =
        Selector::parse("div.articleDisplay").map_err(|e| ScrapeError::Parse(e.to_string()))?;

    let mut records = Vec::new();
    for article in document.select(&article_selector) {
        let children: Vec<ElementRef> = article.children().filter_map(ElementRef::wrap).collect();
        let (Some(title), Some(date_holder)) = (children.first(), children.get(3)) else {
            return Err(ScrapeError::Parse(format!(
                "article has {} child elements, expected at least 4",
                children.len()
            )));
        };
        let title = title.text().collect::<String>().trim().to_string();
        let date = listing_date(&date_holder.text().collect::<String>(), now)?;
        records.push(Record::new(date.and_time(chrono::NaiveTime::MIN), title));
    }
    Ok(records)
}

/// Resolve the publication date printed next to an article.
///
/// Tried in order: an absolute `DD/MM/YYYY` date, an `N ώ` hours-ago marker
/// relative to `now`, and finally `now` itself.
pub fn listing_date(text: &str, now: NaiveDateTime) -> Result<NaiveDate, ScrapeError> {
    if let Some(m) = ABSOLUTE_DATE.find(text) {
        return NaiveDate::parse_from_str(m.as_str(), "%d/%m/%Y")
            .map_err(|e| ScrapeError::Parse(format!("bad date {:?}: {e}", m.as_str())));
    }
    if let Some(caps) = HOURS_AGO.captures(text) {
        let hours: i64 = caps[1]
            .parse()
            .map_err(|e| ScrapeError::Parse(format!("bad hour count {:?}: {e}", &caps[1])))?;
        let earlier = Duration::try_hours(hours)
            .and_then(|d| now.checked_sub_signed(d))
            .ok_or_else(|| ScrapeError::Parse(format!("hour count out of range: {hours}")))?;
        return Ok(earlier.date());
    }
    Ok(now.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 3, 31)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap()
    }

    fn tag_page(items: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body>");
        for (title, date) in items {
            html.push_str(&format!(
                "<div class=\"jsx-3244605671 articleDisplay\"><h3>{title}</h3><a href=\"/x\">img</a><span>Πολιτισμός</span><div class=\"meta\">{date}</div></div>"
            ));
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn test_listing_date_absolute() {
        let date = listing_date("Πολιτισμός | 12/02/2021 | πριν 3 ώρες", now()).unwrap();
        assert_eq!(date.format("%d/%m/%Y").to_string(), "12/02/2021");
    }

    #[test]
    fn test_listing_date_relative_hours() {
        let date = listing_date("πριν 3 ώρες", now()).unwrap();
        let expected = (now() - Duration::hours(3)).date();
        assert_eq!(date, expected);
        // 01:30 minus three hours crosses midnight
        assert_eq!(date.format("%d/%m/%Y").to_string(), "30/03/2021");
    }

    #[test]
    fn test_listing_date_rejects_oversized_hour_count() {
        // Past the range of NaiveDateTime
        assert!(matches!(
            listing_date("πριν 10000000000 ώρες", now()),
            Err(ScrapeError::Parse(_))
        ));
        // Past the range of Duration itself
        assert!(matches!(
            listing_date("3000000000000 ώρες", now()),
            Err(ScrapeError::Parse(_))
        ));
        // Does not fit in i64
        assert!(matches!(
            listing_date("99999999999999999999 ώρες", now()),
            Err(ScrapeError::Parse(_))
        ));
    }

    #[test]
    fn test_listing_date_fallback_is_today() {
        let date = listing_date("μόλις τώρα", now()).unwrap();
        assert_eq!(date.format("%d/%m/%Y").to_string(), "31/03/2021");
    }

    #[test]
    fn test_parse_tag_page() {
        let html = tag_page(&[("Τίτλος Α", "05/03/2021"), ("Τίτλος Β", "2 ώρες")]);
        let records = parse_tag_page(&html, now()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Τίτλος Α");
        assert_eq!(records[0].date.to_string(), "2021-03-05 00:00:00");
        assert_eq!(records[1].date.to_string(), "2021-03-30 00:00:00");
    }

    #[test]
    fn test_parse_tag_page_short_article_is_error() {
        let html = "<div class=\"articleDisplay\"><h3>t</h3></div>";
        assert!(matches!(parse_tag_page(html, now()), Err(ScrapeError::Parse(_))));
    }

    async fn mount_page(server: &MockServer, page: u32, body: String) {
        Mock::given(method("GET"))
            .and(path(format!("/tag/dimitris-lignadis/page/{page}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn options(server: &MockServer, dir: &tempfile::TempDir, pages: u32) -> NewsbeastOptions {
        let mut opts = NewsbeastOptions::new(dir.path());
        opts.base_url = server.uri();
        opts.pages = pages;
        opts.now = now();
        opts
    }

    #[tokio::test]
    async fn test_scrape_rewrites_cumulatively() {
        let server = MockServer::start().await;
        mount_page(&server, 1, tag_page(&[("Α", "01/03/2021")])).await;
        mount_page(&server, 2, tag_page(&[("Β", "02/03/2021")])).await;
        // page 3 fails; pages 1 and 2 must already be on disk
        Mock::given(method("GET"))
            .and(path("/tag/dimitris-lignadis/page/3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let opts = options(&server, &dir, 3);
        let err = scrape(&Client::new(), &opts).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { .. }));

        let file = dir
            .path()
            .join("dimitris-lignadis_newsbeast_2021-03-31_01:30.csv");
        let written = std::fs::read_to_string(file).unwrap();
        assert_eq!(
            written,
            "date|text\n2021-03-01 00:00:00|Α\n2021-03-02 00:00:00|Β\n"
        );
    }

    #[tokio::test]
    async fn test_scrape_keeps_repeated_first_page_by_default() {
        let server = MockServer::start().await;
        let first = tag_page(&[("Α", "01/03/2021"), ("Β", "02/03/2021")]);
        mount_page(&server, 1, first.clone()).await;
        mount_page(&server, 2, first).await;

        let dir = tempfile::tempdir().unwrap();
        let report = scrape(&Client::new(), &options(&server, &dir, 2)).await.unwrap();
        assert_eq!(report.requests, 2);
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.records[0], report.records[2]);
    }

    #[tokio::test]
    async fn test_scrape_strict_rejects_repeated_first_page() {
        let server = MockServer::start().await;
        let first = tag_page(&[("Α", "01/03/2021")]);
        mount_page(&server, 1, first.clone()).await;
        mount_page(&server, 2, tag_page(&[("Β", "02/03/2021")])).await;
        mount_page(&server, 3, first).await;

        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&server, &dir, 5);
        opts.strict = true;
        let err = scrape(&Client::new(), &opts).await.unwrap_err();
        assert!(matches!(err, ScrapeError::PageOutOfRange { page: 3 }));

        let written = std::fs::read_to_string(
            dir.path()
                .join("dimitris-lignadis_newsbeast_2021-03-31_01:30.csv"),
        )
        .unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_scrape_stops_at_empty_page() {
        let server = MockServer::start().await;
        mount_page(&server, 1, tag_page(&[("Α", "01/03/2021")])).await;
        mount_page(&server, 2, tag_page(&[])).await;

        let dir = tempfile::tempdir().unwrap();
        let report = scrape(&Client::new(), &options(&server, &dir, 16)).await.unwrap();
        assert_eq!(report.requests, 2);
        assert_eq!(report.records.len(), 1);
    }
}
