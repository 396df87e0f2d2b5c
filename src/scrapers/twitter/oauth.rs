//! OAuth 1.0a request signing (HMAC-SHA1) for the Twitter v1.1 API.
//!
//! The signature covers the HTTP method, the request URL without its query,
//! and every query, body and `oauth_*` parameter, each percent-encoded with
//! the RFC 3986 unreserved set.

use crate::config::Credentials;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric, rng};
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// Percent-encode with the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`).
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Random nonce: 32 alphanumeric characters.
pub fn nonce() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Build the signature base string.
///
/// `params` are raw (decoded) name/value pairs; encoding and sorting happen here.
pub fn signature_base_string(method: &str, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url.as_str()),
        percent_encode(&param_string)
    )
}

/// HMAC-SHA1 over `base_string`, base64 encoded.
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Value of the `Authorization` header for one request.
///
/// Query parameters are taken from `url`; form body parameters, if any, go in
/// `body_params`.
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &Url,
    body_params: &[(&str, &str)],
    nonce: &str,
    timestamp: i64,
) -> String {
    let timestamp = timestamp.to_string();
    let oauth_params = [
        ("oauth_consumer_key", credentials.api_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", "1.0"),
    ];

    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.extend(
        body_params
            .iter()
            .chain(oauth_params.iter())
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );

    let base = signature_base_string(method, url, &params);
    let signature = sign(
        &base,
        &credentials.api_key_secret,
        &credentials.access_token_secret,
    );

    let fields = oauth_params
        .iter()
        .copied()
        .chain(std::iter::once(("oauth_signature", signature.as_str())))
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}
