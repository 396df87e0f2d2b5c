//! Source scrapers.
//!
//! Each submodule is a self-contained fetch, parse and write pipeline for one
//! source. They share the error type, the [`Record`](crate::models::Record)
//! model and the output writer, but no parsing logic.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Output |
//! |--------|--------|--------|--------|
//! | news247.gr | [`news247`] | HTML listing pages, stops at the first empty page | written once |
//! | newsbeast.gr | [`newsbeast`] | HTML tag pages | rewritten after every page |
//! | Twitter | [`twitter`] | v1.1 REST API, OAuth 1.0a | written once |
//!
//! Requests are issued one after the other; nothing is retried.

pub mod news247;
pub mod newsbeast;
pub mod twitter;

use crate::error::ScrapeError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use tracing::{debug, instrument};

/// GET `url` and return the body, mapping failures onto [`ScrapeError`].
#[instrument(level = "debug", skip(client))]
pub(crate) async fn fetch_page(client: &Client, url: &str) -> Result<String, ScrapeError> {
    let transport = |source| ScrapeError::Transport {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        debug!(%status, body = %truncate_for_log(&body, 300), "Non-success response");
        return Err(ScrapeError::from_status(url, status, &body));
    }
    debug!(bytes = body.len(), "Fetched page");
    Ok(body)
}
