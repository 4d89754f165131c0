//! OMDb API client
//!
//! Looks up a movie by title with a single GET and extracts year, IMDb rating
//! and poster. OMDb answers `"N/A"` for unknown fields and
//! `{"Response": "False", "Error": "..."}` for unknown titles.
//!
//! API documentation: https://www.omdbapi.com/

use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use url::Url;

use crate::config::LookupConfig;
use crate::domain::result::{Error, Result};
use crate::ports::{LookupResult, MovieLookup};

/// Placeholder OMDb uses for missing data
const NOT_AVAILABLE: &str = "N/A";

/// Raw OMDb response; every field is optional because error bodies only
/// carry `Response` and `Error`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(default)]
    poster: Option<String>,
}

/// OMDb HTTP client
#[derive(Debug)]
pub struct OmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout_secs: u64,
}

impl OmdbClient {
    /// Create a client for an endpoint
    pub fn new(api_key: &str, base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            anyhow::bail!("OMDb API key cannot be empty");
        }

        let base_url = Url::parse(base_url).context("Invalid OMDb URL")?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("OMDb URL must use http or https");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            timeout_secs,
        })
    }

    /// Fetch details for a title
    ///
    /// `NotFound` carries the API's own message for unknown titles;
    /// transport and decoding problems are `Lookup` errors.
    pub fn fetch(&self, title: &str) -> Result<LookupResult> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::Lookup(format!("Failed to read OMDb response: {}", e)))?;

        let data: OmdbResponse = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                return Err(Error::Lookup(format!("OMDb API error: HTTP {}", status.as_u16())))
            }
            Err(e) => return Err(Error::Lookup(format!("Failed to parse OMDb response: {}", e))),
        };

        if data.response.as_deref() == Some("False") {
            let message = data.error.unwrap_or_else(|| "Movie not found!".to_string());
            return Err(Error::NotFound(message));
        }

        Ok(map_response(data))
    }

    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Lookup(format!(
                "OMDb request timed out after {} seconds",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            Error::Lookup("Unable to connect to OMDb".to_string())
        } else {
            Error::Lookup(format!("OMDb request failed: {}", error))
        }
    }
}

fn map_response(data: OmdbResponse) -> LookupResult {
    LookupResult {
        year: data.year.as_deref().and_then(parse_year),
        rating: available(data.imdb_rating.as_deref()).and_then(|r| r.parse::<f64>().ok()),
        poster_url: available(data.poster.as_deref()).map(str::to_string),
        message: None,
    }
}

/// Treat `"N/A"` and blank strings as missing
fn available(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

/// Leading four-digit year; series report ranges like `2008–2013`
fn parse_year(raw: &str) -> Option<i32> {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    let re = YEAR.get_or_init(|| Regex::new(r"^\s*(\d{4})").expect("valid year regex"));
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// =============================================================================
// OmdbProvider - implements MovieLookup
// =============================================================================

/// OMDb metadata provider
///
/// Built from configuration. Without an API key it stays usable and reports
/// every lookup as unavailable, so adding movies falls back to manual entry.
pub struct OmdbProvider {
    client: std::result::Result<OmdbClient, String>,
}

impl OmdbProvider {
    pub fn from_config(config: &LookupConfig) -> Self {
        let client = match config.api_key.as_deref() {
            Some(key) => OmdbClient::new(key, &config.base_url, config.timeout_secs)
                .map_err(|e| e.to_string()),
            None => Err(format!(
                "No OMDb API key configured (set {} or lookup.apiKey in settings.json)",
                crate::config::API_KEY_ENV
            )),
        };
        Self { client }
    }
}

impl MovieLookup for OmdbProvider {
    fn name(&self) -> &str {
        "omdb"
    }

    fn lookup(&self, title: &str) -> LookupResult {
        let client = match &self.client {
            Ok(client) => client,
            Err(reason) => return LookupResult::missing(reason.clone()),
        };

        match client.fetch(title) {
            Ok(result) => result,
            Err(Error::NotFound(message)) => {
                log::info!("OMDb has no match for {:?}: {}", title, message);
                LookupResult::missing(message)
            }
            Err(e) => {
                log::warn!("OMDb lookup for {:?} failed: {}", title, e);
                LookupResult::missing(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::omdb_mock::MockOmdbServer;

    fn provider_for(server: &MockOmdbServer, key: &str) -> OmdbProvider {
        OmdbProvider::from_config(&LookupConfig {
            api_key: Some(key.to_string()),
            base_url: server.base_url(),
            timeout_secs: 5,
        })
    }

    #[test]
    fn test_reject_empty_api_key() {
        let err = OmdbClient::new("  ", "http://localhost", 5).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_reject_non_http_url() {
        let err = OmdbClient::new("key", "ftp://omdbapi.com", 5).unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2010"), Some(2010));
        assert_eq!(parse_year("2008–2013"), Some(2008));
        assert_eq!(parse_year("N/A"), None);
        assert_eq!(parse_year("19"), None);
    }

    #[test]
    fn test_map_response_skips_not_available() {
        let result = map_response(OmdbResponse {
            response: Some("True".to_string()),
            year: Some("1999".to_string()),
            imdb_rating: Some("N/A".to_string()),
            poster: Some("N/A".to_string()),
            ..Default::default()
        });
        assert_eq!(result.year, Some(1999));
        assert_eq!(result.rating, None);
        assert_eq!(result.poster_url, None);
    }

    #[test]
    fn test_lookup_found() {
        let server = MockOmdbServer::start().unwrap();
        let result = provider_for(&server, "test_key").lookup("Inception");

        assert_eq!(result.year, Some(2010));
        assert_eq!(result.rating, Some(8.8));
        assert_eq!(
            result.poster_url.as_deref(),
            Some("https://posters.example/inception.jpg")
        );
        assert!(result.is_complete());
        assert!(result.message.is_none());
    }

    #[test]
    fn test_lookup_title_with_spaces() {
        let server = MockOmdbServer::start().unwrap();
        let result = provider_for(&server, "test_key").lookup("Breaking Bad");
        assert_eq!(result.year, Some(2008));
        assert_eq!(result.rating, Some(9.5));
    }

    #[test]
    fn test_lookup_not_found() {
        let server = MockOmdbServer::start().unwrap();
        let result = provider_for(&server, "test_key").lookup("No Such Film");

        assert!(!result.is_complete());
        assert_eq!(result.year, None);
        assert_eq!(result.message.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_lookup_partial_data() {
        let server = MockOmdbServer::start().unwrap();
        let result = provider_for(&server, "test_key").lookup("Obscure Short");

        assert_eq!(result.year, Some(1999));
        assert_eq!(result.rating, None);
        assert_eq!(result.poster_url, None);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_lookup_invalid_key() {
        let server = MockOmdbServer::start().unwrap();
        let result = provider_for(&server, "wrong").lookup("Inception");

        assert!(!result.is_complete());
        assert_eq!(result.message.as_deref(), Some("Invalid API key!"));
    }

    #[test]
    fn test_lookup_garbage_body() {
        let server = MockOmdbServer::start().unwrap();
        let result = provider_for(&server, "test_key").lookup("Broken");

        assert!(!result.is_complete());
        assert!(result.message.unwrap().contains("HTTP 500"));
    }

    #[test]
    fn test_lookup_connection_refused() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let provider = OmdbProvider::from_config(&LookupConfig {
            api_key: Some("test_key".to_string()),
            base_url: format!("http://127.0.0.1:{}/", port),
            timeout_secs: 2,
        });

        let result = provider.lookup("Inception");
        assert_eq!(result.year, None);
        assert_eq!(result.rating, None);
        assert_eq!(result.poster_url, None);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_lookup_without_api_key() {
        let provider = OmdbProvider::from_config(&LookupConfig::default());
        let result = provider.lookup("Inception");

        assert!(!result.is_complete());
        assert!(result.message.unwrap().contains("No OMDb API key"));
    }
}
