use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_UPSTREAM_URL: &str = "https://trends.google.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TZ_OFFSET: i32 = 360;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
    /// Minutes offset from UTC, in the provider's sign convention.
    pub tz_offset: i32,
    /// Fixes the fallback RNG so synthetic output is reproducible.
    pub fallback_seed: Option<u64>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tz_offset: DEFAULT_TZ_OFFSET,
            fallback_seed: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let timeout_secs = parse_or("TRENDS_UPSTREAM_TIMEOUT_SECS", &lookup, DEFAULT_TIMEOUT_SECS)?;

        Ok(Config {
            host: lookup("TRENDS_HOST").unwrap_or(defaults.host),
            port: parse_or("TRENDS_PORT", &lookup, DEFAULT_PORT)?,
            upstream_url: lookup("TRENDS_UPSTREAM_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_url),
            upstream_timeout: Duration::from_secs(timeout_secs),
            tz_offset: parse_or("TRENDS_TZ_OFFSET", &lookup, DEFAULT_TZ_OFFSET)?,
            fallback_seed: match lookup("TRENDS_FALLBACK_SEED") {
                Some(raw) => Some(parse_value("TRENDS_FALLBACK_SEED", &raw)?),
                None => None,
            },
            log_filter: lookup("TRENDS_LOG").unwrap_or(defaults.log_filter),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn fallback_rng(&self) -> fastrand::Rng {
        match self.fallback_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
