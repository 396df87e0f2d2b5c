//! Minimal signed client for the two Twitter v1.1 endpoints the strategies use.
//!
//! Every request carries an OAuth 1.0a `Authorization` header built from the
//! four user credentials. Failures are mapped onto [`ScrapeError`] and never
//! retried; 401/403 become [`ScrapeError::Auth`] and 429 becomes
//! [`ScrapeError::RateLimited`].

use crate::config::Credentials;
use crate::error::ScrapeError;
use crate::scrapers::twitter::oauth::{authorization_header, nonce, percent_encode};
use crate::scrapers::twitter::types::{SearchResponse, Status};
use crate::utils::truncate_for_log;
use chrono::Utc;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

#[derive(Clone)]
pub struct TwitterApi {
    http: Client,
    base_url: Url,
    credentials: Credentials,
}

impl std::fmt::Debug for TwitterApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterApi")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl TwitterApi {
    pub fn new(http: Client, base_url: &str, credentials: Credentials) -> Result<Self, ScrapeError> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| ScrapeError::Decode {
            url: base_url.to_string(),
            message: format!("invalid base URL: {e}"),
        })?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// `GET 1.1/search/tweets.json` with extended text.
    ///
    /// `max_id` restricts results to ids at or below it.
    #[instrument(level = "debug", skip(self))]
    pub async fn search(
        &self,
        query: &str,
        count: u32,
        max_id: Option<u64>,
    ) -> Result<Vec<Status>, ScrapeError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("count", count.to_string()),
            ("tweet_mode", "extended".to_string()),
        ];
        if let Some(max_id) = max_id {
            params.push(("max_id", max_id.to_string()));
        }
        let resp: SearchResponse = self.get_json("1.1/search/tweets.json", &params).await?;
        Ok(resp.statuses)
    }

    /// `GET 1.1/statuses/user_timeline.json` with extended text.
    #[instrument(level = "debug", skip(self))]
    pub async fn user_timeline(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<Status>, ScrapeError> {
        let params = [
            ("screen_name", screen_name.to_string()),
            ("count", count.to_string()),
            ("tweet_mode", "extended".to_string()),
        ];
        self.get_json("1.1/statuses/user_timeline.json", &params)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ScrapeError> {
        let mut url = self.base_url.join(path).map_err(|e| ScrapeError::Decode {
            url: path.to_string(),
            message: format!("invalid endpoint: {e}"),
        })?;
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));

        let auth = authorization_header(
            &self.credentials,
            "GET",
            &url,
            &[],
            &nonce(),
            Utc::now().timestamp(),
        );

        let endpoint = format!("{}{}", self.base_url, path);
        let transport = |source| ScrapeError::Transport {
            url: endpoint.clone(),
            source,
        };
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(%status, bytes = body.len(), endpoint = %endpoint, "Twitter response");

        if !status.is_success() {
            return Err(ScrapeError::from_status(&endpoint, status, &body));
        }
        serde_json::from_str(&body).map_err(|e| ScrapeError::Decode {
            url: endpoint.clone(),
            message: format!("{e}; body: {}", truncate_for_log(&body, 300)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials {
            api_key: "k".into(),
            api_key_secret: "ks".into(),
            access_token: "t".into(),
            access_token_secret: "ts".into(),
        }
    }

    #[tokio::test]
    async fn test_search_sends_signed_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1/search/tweets.json"))
            .and(query_param("q", "#Λιγνάδης"))
            .and(query_param("tweet_mode", "extended"))
            .and(query_param("count", "100"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"statuses":[{"id":7,"created_at":"Wed Mar 31 12:34:56 +0000 2021","full_text":"x"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let api = TwitterApi::new(Client::new(), &server.uri(), credentials()).unwrap();
        let statuses = api.search("#Λιγνάδης", 100, None).await.unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].id, 7);

        let requests = server.received_requests().await.unwrap();
        let auth = requests[0].headers.get("authorization").unwrap();
        assert!(auth.to_str().unwrap().starts_with("OAuth oauth_consumer_key=\"k\""));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1/statuses/user_timeline.json"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#),
            )
            .mount(&server)
            .await;

        let api = TwitterApi::new(Client::new(), &server.uri(), credentials()).unwrap();
        let err = api.user_timeline("ta_nea", 100).await.unwrap_err();
        match err {
            ScrapeError::Auth { message, .. } => assert!(message.contains("Could not authenticate")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_and_bad_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/1.1/statuses/user_timeline.json"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/search/tweets.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let api = TwitterApi::new(Client::new(), &server.uri(), credentials()).unwrap();
        let err = api.user_timeline("ta_nea", 100).await.unwrap_err();
        assert!(matches!(err, ScrapeError::RateLimited { .. }));
        assert!(err.is_transient());

        let err = api.search("#x", 10, Some(5)).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Decode { .. }));
        assert!(!err.is_transient());
    }
}
