//! Runtime configuration for War Room clients.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file by the binary). Parsing goes through an injectable lookup so tests can
//! exercise it without touching the real environment.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

const ENV_STORE_URL: &str = "WARROOM_STORE_URL";
const ENV_ROOM_ID: &str = "WARROOM_ROOM_ID";
const ENV_SYNC_INTERVAL_SECS: &str = "WARROOM_SYNC_INTERVAL_SECS";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_API_KEY: &str = "API_KEY";
const ENV_ANALYSIS_MODEL: &str = "WARROOM_ANALYSIS_MODEL";
const ENV_ANALYSIS_URL: &str = "WARROOM_ANALYSIS_URL";

pub const DEFAULT_STORE_URL: &str = "https://api.restful-api.dev";
pub const DEFAULT_ROOM_ID: &str = "warroom-registry";
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_ANALYSIS_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Where and how often a client replicates its record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Object store base URL, without trailing slash
    pub store_url: String,
    /// Deployment key: the `name` of the shared snapshot object
    pub room_id: String,
    /// Period between scheduled passes
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            room_id: DEFAULT_ROOM_ID.to_string(),
            interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        parse_sync_config(|key| env::var(key).ok())
    }
}

/// Generative-AI endpoint settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AnalysisConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AnalysisConfig {
    /// Load analysis settings from the environment.
    ///
    /// Returns `Ok(None)` when no API key is set, which disables analysis.
    pub fn from_env() -> Result<Option<Self>> {
        parse_analysis_config(|key| env::var(key).ok())
    }
}

pub fn parse_sync_config(lookup: impl Fn(&str) -> Option<String>) -> Result<SyncConfig> {
    let store_url = match normalize_text_option(lookup(ENV_STORE_URL)) {
        Some(url) => normalize_http_url(&url, ENV_STORE_URL)?,
        None => DEFAULT_STORE_URL.to_string(),
    };

    let room_id =
        normalize_text_option(lookup(ENV_ROOM_ID)).unwrap_or_else(|| DEFAULT_ROOM_ID.to_string());

    let interval = match normalize_text_option(lookup(ENV_SYNC_INTERVAL_SECS)) {
        Some(raw) => {
            let seconds = raw.parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{ENV_SYNC_INTERVAL_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            if seconds == 0 {
                return Err(Error::Config(format!(
                    "{ENV_SYNC_INTERVAL_SECS} must be at least 1"
                )));
            }
            Duration::from_secs(seconds)
        }
        None => DEFAULT_SYNC_INTERVAL,
    };

    Ok(SyncConfig {
        store_url,
        room_id,
        interval,
    })
}

pub fn parse_analysis_config(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<AnalysisConfig>> {
    let Some(api_key) = normalize_text_option(lookup(ENV_GEMINI_API_KEY))
        .or_else(|| normalize_text_option(lookup(ENV_API_KEY)))
    else {
        return Ok(None);
    };

    let base_url = match normalize_text_option(lookup(ENV_ANALYSIS_URL)) {
        Some(url) => normalize_http_url(&url, ENV_ANALYSIS_URL)?,
        None => DEFAULT_ANALYSIS_URL.to_string(),
    };
    let model = normalize_text_option(lookup(ENV_ANALYSIS_MODEL))
        .unwrap_or_else(|| DEFAULT_ANALYSIS_MODEL.to_string());

    Ok(Some(AnalysisConfig {
        api_key,
        base_url,
        model,
    }))
}

fn normalize_http_url(value: &str, field: &str) -> Result<String> {
    if is_http_url(value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(format!(
            "{field} must include http:// or https://"
        )))
    }
}
