#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result, anyhow};
use std::{env, path::PathBuf, time::Duration};

use crate::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_FALLBACK_URL, DEFAULT_FUZZY_LIMIT, DEFAULT_FUZZY_THRESHOLD,
    PLACEHOLDER, STORE_FILE, Scorer,
};

pub const ENV_STORE_PATH: &str = "FROGLOL_STORE_PATH";
pub const ENV_FUZZY_THRESHOLD: &str = "FROGLOL_FUZZY_THRESHOLD";
pub const ENV_FUZZY_LIMIT: &str = "FROGLOL_FUZZY_LIMIT";
pub const ENV_FUZZY_CACHE_TTL: &str = "FROGLOL_FUZZY_CACHE_TTL";
pub const ENV_FUZZY_SCORER: &str = "FROGLOL_FUZZY_SCORER";
pub const ENV_FALLBACK_URL: &str = "FROGLOL_FALLBACK_URL";

/// Runtime configuration for the resolver and the bookmark store
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Location of the JSON bookmark store
    pub store_path: PathBuf,
    pub fuzzy_threshold: u8,
    pub fuzzy_limit: usize,
    pub fuzzy_cache_ttl: Duration,
    pub scorer: Scorer,
    /// Template used when nothing matches, normally containing `%s`
    pub fallback_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_limit: DEFAULT_FUZZY_LIMIT,
            fuzzy_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            scorer: Scorer::default(),
            fallback_url: DEFAULT_FALLBACK_URL.to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `FROGLOL_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(path) = lookup(ENV_STORE_PATH) {
            settings.store_path = PathBuf::from(path);
        }
        if let Some(threshold) = lookup(ENV_FUZZY_THRESHOLD) {
            settings.fuzzy_threshold = threshold
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_FUZZY_THRESHOLD}: {threshold}"))?;
        }
        if let Some(limit) = lookup(ENV_FUZZY_LIMIT) {
            settings.fuzzy_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_FUZZY_LIMIT}: {limit}"))?;
        }
        if let Some(ttl) = lookup(ENV_FUZZY_CACHE_TTL) {
            settings.fuzzy_cache_ttl = parse_ttl(&ttl)
                .with_context(|| format!("Invalid {ENV_FUZZY_CACHE_TTL}: {ttl}"))?;
        }
        if let Some(scorer) = lookup(ENV_FUZZY_SCORER) {
            settings.scorer = scorer
                .parse()
                .map_err(|e: String| anyhow!(e))
                .with_context(|| format!("Invalid {ENV_FUZZY_SCORER}"))?;
        }
        if let Some(url) = lookup(ENV_FALLBACK_URL) {
            settings.fallback_url = url;
        }

        if !settings.fallback_url.contains(PLACEHOLDER) {
            log::warn!(
                "Fallback URL '{}' has no {PLACEHOLDER} placeholder, queries will be dropped",
                settings.fallback_url
            );
        }

        Ok(settings)
    }
}

/// Parse a cache TTL given either as whole seconds or as a duration like `90s`
///
/// # Errors
///
/// Returns an error if the value is neither.
pub fn parse_ttl(value: &str) -> Result<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(value).with_context(|| format!("'{value}' is not a duration"))
}

/// Default location of the bookmark store
#[must_use]
pub fn default_store_path() -> PathBuf {
    if let Some(dir) = dirs::data_dir() {
        return dir.join("froglol").join(STORE_FILE);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(format!(".{STORE_FILE}"));
    }
    PathBuf::from(STORE_FILE)
}
