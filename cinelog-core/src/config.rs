//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "lookup": { "apiKey": "...", "baseUrl": "http://www.omdbapi.com/", "timeoutSecs": 10 },
//!   "site": { "templatePath": null, "outputDir": null, "pageTitle": null,
//!             "placeholderPoster": "https://via.placeholder.com/128x193.png?text=No+Image" }
//! }
//! ```
//! Keys the CLI does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default OMDb endpoint
pub const DEFAULT_LOOKUP_URL: &str = "http://www.omdbapi.com/";

/// Default lookup timeout in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Poster shown for movies without one
pub const DEFAULT_PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/128x193.png?text=No+Image";

/// Environment variable overriding the OMDb API key
pub const API_KEY_ENV: &str = "CINELOG_OMDB_API_KEY";

/// Environment variable overriding the OMDb endpoint
pub const LOOKUP_URL_ENV: &str = "CINELOG_OMDB_URL";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    lookup: LookupSettings,
    #[serde(default)]
    site: SiteSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder_poster: Option<String>,
}

/// Metadata lookup settings
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LOOKUP_URL.to_string(),
            timeout_secs: DEFAULT_LOOKUP_TIMEOUT_SECS,
        }
    }
}

/// Site generation settings
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Template file; the built-in template is used when unset
    pub template_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Page title; defaults to "{user}'s Movie App"
    pub page_title: Option<String>,
    pub placeholder_poster: String,
}

impl SiteConfig {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_path: None,
            output_dir: output_dir.into(),
            page_title: None,
            placeholder_poster: DEFAULT_PLACEHOLDER_POSTER.to_string(),
        }
    }
}

/// cinelog configuration (resolved view of settings.json plus environment)
#[derive(Debug, Clone)]
pub struct Config {
    pub lookup: LookupConfig,
    pub site: SiteConfig,
}

impl Config {
    /// Defaults for a data directory, ignoring settings.json and environment
    pub fn defaults(data_dir: &Path) -> Self {
        Self {
            lookup: LookupConfig::default(),
            site: SiteConfig::with_output_dir(data_dir.join("site")),
        }
    }

    /// Load config from the data directory
    ///
    /// `CINELOG_OMDB_API_KEY` and `CINELOG_OMDB_URL` win over the file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(&data_dir.join("settings.json"))?;
        let mut config = Self::from_settings(data_dir, raw);

        if let Some(key) = non_empty_env(API_KEY_ENV) {
            config.lookup.api_key = Some(key);
        }
        if let Some(url) = non_empty_env(LOOKUP_URL_ENV) {
            config.lookup.base_url = url;
        }

        Ok(config)
    }

    fn from_settings(data_dir: &Path, raw: SettingsFile) -> Self {
        let defaults = Self::defaults(data_dir);

        let lookup = LookupConfig {
            api_key: raw.lookup.api_key.filter(|k| !k.trim().is_empty()),
            base_url: raw.lookup.base_url.unwrap_or(defaults.lookup.base_url),
            timeout_secs: raw.lookup.timeout_secs.unwrap_or(defaults.lookup.timeout_secs),
        };

        // Relative paths in settings.json are relative to the data directory
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { data_dir.join(p) };

        let site = SiteConfig {
            template_path: raw.site.template_path.map(resolve),
            output_dir: raw
                .site
                .output_dir
                .map(resolve)
                .unwrap_or(defaults.site.output_dir),
            page_title: raw.site.page_title,
            placeholder_poster: raw
                .site
                .placeholder_poster
                .unwrap_or(defaults.site.placeholder_poster),
        };

        Self { lookup, site }
    }

    /// Store an API key in settings.json, keeping everything else untouched
    pub fn save_api_key(data_dir: &Path, api_key: &str) -> Result<()> {
        let settings_path = data_dir.join("settings.json");
        let mut settings = parse_settings(&settings_path)?;
        settings.lookup.api_key = Some(api_key.trim().to_string());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}

/// Lenient read for loading: a malformed file behaves like a missing one
fn read_settings(path: &Path) -> Result<SettingsFile> {
    match parse_settings(path) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            log::warn!("ignoring settings: {:#}", e);
            Ok(SettingsFile::default())
        }
    }
}

/// Strict read used before saving; a malformed file is an error
fn parse_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Malformed {}", path.display()))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
