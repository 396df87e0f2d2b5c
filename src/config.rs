//! YAML configuration: Twitter credentials and optional scraper settings.
//!
//! Credentials live in a flat key-value document:
//!
//! ```yaml
//! api_key: "..."
//! api_key_secret: "..."
//! access_token: "..."
//! access_token_secret: "..."
//! ```
//!
//! A missing file, a missing key or an empty value is fatal, and is reported
//! before any request goes out.

use crate::error::ScrapeError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Default credentials file for the cursor strategy.
pub const CURSOR_CREDENTIALS_FILE: &str = "twitter-twitter-credentials.yaml";
/// Default credentials file for the keyword strategy.
pub const KEYWORD_CREDENTIALS_FILE: &str = "twitter-credentials.yaml";

/// The four OAuth 1.0a secrets of a Twitter app and user.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_key_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_key_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Load and validate a credentials file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        let text = std::fs::read_to_string(path).map_err(|e| ScrapeError::Credentials {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let credentials = Self::parse(&text).map_err(|message| ScrapeError::Credentials {
            path: path.to_path_buf(),
            message,
        })?;
        info!("Loaded Twitter credentials");
        Ok(credentials)
    }

    fn parse(text: &str) -> Result<Self, String> {
        let credentials: Credentials = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        for (key, value) in [
            ("api_key", &credentials.api_key),
            ("api_key_secret", &credentials.api_key_secret),
            ("access_token", &credentials.access_token),
            ("access_token_secret", &credentials.access_token_secret),
        ] {
            if value.trim().is_empty() {
                return Err(format!("`{key}` is empty"));
            }
        }
        Ok(credentials)
    }
}

/// Optional settings file. Every field has a built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keywords: KeywordSettings,
}

/// Accounts, keywords and hashtags of the keyword-filter strategy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordSettings {
    /// Topic part of the output file name.
    pub label: String,
    /// Newspaper accounts whose timelines are filtered by keyword.
    pub newspapers: Vec<String>,
    /// Case-insensitive substrings; a timeline item is kept if it contains any.
    pub keywords: Vec<String>,
    /// Hashtags whose search results are kept unconditionally.
    pub hashtags: Vec<String>,
    /// Items requested per timeline.
    pub timeline_count: u32,
    /// Items requested per hashtag search.
    pub search_count: u32,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            label: "keywords".into(),
            newspapers: [
                "Kathimerini_gr",
                "protothema",
                "efsyntakton",
                "Newsbeast",
                "ta_nea",
                "tovimagr",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            keywords: [
                "Λιγνάδης",
                "καλλιτεχνικού διευθυντή",
                "καλλιτεχνικός διευθυντής",
                "επίδαυρος",
                "επιδαύρου",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            hashtags: ["#Λιγνάδης", "#Λιγναδης_gate", "#lignadis"]
                .into_iter()
                .map(String::from)
                .collect(),
            timeline_count: 100,
            search_count: 100,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or use the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ScrapeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config_error = |message: String| ScrapeError::Config {
            path: PathBuf::from(path),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let settings: Settings =
            serde_yaml::from_str(&text).map_err(|e| config_error(e.to_string()))?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_yaml(dir: &tempfile::TempDir, name: &str, yaml: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, yaml).expect("write yaml");
        p
    }

    #[test]
    fn test_credentials_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_yaml(
            &dir,
            "creds.yaml",
            "api_key: k\napi_key_secret: ks\naccess_token: t\naccess_token_secret: ts\n",
        );
        let c = Credentials::load(&p).unwrap();
        assert_eq!(c.api_key, "k");
        assert_eq!(c.access_token_secret, "ts");
    }

    #[test]
    fn test_credentials_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_yaml(
            &dir,
            "creds.yaml",
            "api_key: k\napi_key_secret: ks\naccess_token_secret: ts\n",
        );
        match Credentials::load(&p) {
            Err(ScrapeError::Credentials { message, .. }) => {
                assert!(message.contains("access_token"), "{message}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_credentials_empty_value() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_yaml(
            &dir,
            "creds.yaml",
            "api_key: k\napi_key_secret: ks\naccess_token: ''\naccess_token_secret: ts\n",
        );
        assert!(matches!(
            Credentials::load(&p),
            Err(ScrapeError::Credentials { .. })
        ));
    }

    #[test]
    fn test_credentials_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            Credentials::load(&missing),
            Err(ScrapeError::Credentials { .. })
        ));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let c = Credentials {
            api_key: "secret-key".into(),
            api_key_secret: "x".into(),
            access_token: "y".into(),
            access_token_secret: "z".into(),
        };
        assert!(!format!("{c:?}").contains("secret-key"));
    }

    #[test]
    fn test_settings_defaults() {
        let s = Settings::load(None).unwrap();
        assert_eq!(s.keywords.newspapers.len(), 6);
        assert_eq!(s.keywords.hashtags[2], "#lignadis");
        assert_eq!(s.keywords.label, "keywords");
    }

    #[test]
    fn test_settings_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_yaml(
            &dir,
            "settings.yaml",
            "keywords:\n  label: epidavros\n  hashtags: ['#epidavros']\n",
        );
        let s = Settings::load(Some(&p)).unwrap();
        assert_eq!(s.keywords.label, "epidavros");
        assert_eq!(s.keywords.hashtags, vec!["#epidavros".to_string()]);
        assert_eq!(s.keywords.keywords.len(), 5);
        assert_eq!(s.keywords.timeline_count, 100);
    }
}
