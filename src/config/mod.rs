//! Configuration handling for the binary.
//!
//! The library core takes its settings as plain values; only the binary reads
//! the environment. `Config::from_env` falls back to the documented defaults
//! for anything unset and rejects values that do not parse.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::{
    digest::DEFAULT_CONCURRENCY,
    links::{DEFAULT_LINK_LIMIT, HACKER_NEWS_URL, ListingLayout},
    service::DigestSettings,
    summary::DEFAULT_SUMMARY_CHARS,
};

/// Environment variable names.
pub const ENV_TIMEOUT_SECS: &str = "HACKERDIGEST_TIMEOUT_SECS";
pub const ENV_SUMMARY_CHARS: &str = "HACKERDIGEST_SUMMARY_CHARS";
pub const ENV_TOP_LINKS: &str = "HACKERDIGEST_TOP_LINKS";
pub const ENV_CONCURRENCY: &str = "HACKERDIGEST_CONCURRENCY";
pub const ENV_LISTING_URL: &str = "HACKERDIGEST_LISTING_URL";
pub const ENV_LOG_FORMAT: &str = "HACKERDIGEST_LOG_FORMAT";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{}'", other)),
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    timeout_secs: u64,
    summary_chars: usize,
    top_links: usize,
    concurrency: usize,
    listing_url: String,
    log_format: LogFormat,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout_secs = parse_var(ENV_TIMEOUT_SECS, defaults.timeout_secs)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS,
                reason: "timeout must be at least one second".to_string(),
            });
        }

        let concurrency = parse_var(ENV_CONCURRENCY, defaults.concurrency)?;
        if concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_CONCURRENCY,
                reason: "concurrency must be at least 1".to_string(),
            });
        }

        let top_links = parse_var(ENV_TOP_LINKS, defaults.top_links)?;
        if !(1..=DEFAULT_LINK_LIMIT).contains(&top_links) {
            return Err(ConfigError::InvalidValue {
                field: ENV_TOP_LINKS,
                reason: format!("top links must be between 1 and {DEFAULT_LINK_LIMIT}"),
            });
        }

        let listing_url = env::var(ENV_LISTING_URL).unwrap_or(defaults.listing_url);
        if let Err(e) = url::Url::parse(&listing_url) {
            return Err(ConfigError::InvalidValue {
                field: ENV_LISTING_URL,
                reason: e.to_string(),
            });
        }

        Ok(Self {
            timeout_secs,
            summary_chars: parse_var(ENV_SUMMARY_CHARS, defaults.summary_chars)?,
            top_links,
            concurrency,
            listing_url,
            log_format: parse_var(ENV_LOG_FORMAT, defaults.log_format)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Characters kept by `summarize_link` before the `...` marker.
    pub fn summary_chars(&self) -> usize {
        self.summary_chars
    }

    pub fn top_links(&self) -> usize {
        self.top_links
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn digest_settings(&self) -> DigestSettings {
        DigestSettings {
            timeout: self.timeout(),
            summary_chars: self.summary_chars,
            top_links: self.top_links,
            concurrency: self.concurrency,
            layout: ListingLayout::hacker_news().with_listing_url(self.listing_url.clone()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            summary_chars: DEFAULT_SUMMARY_CHARS,
            top_links: DEFAULT_LINK_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            listing_url: HACKER_NEWS_URL.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

fn parse_var<T>(field: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(field) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field,
                reason: format!("'{}': {}", raw, e),
            }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
