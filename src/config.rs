use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_UPSTREAMS: &str = "https://blockstream.info/api";
const DEFAULT_CACHE_TTL_SECS: u64 = 30;
const DEFAULT_RATE_LIMIT_RPS: i64 = 5;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream base URLs in failover priority order.
    pub upstreams: Vec<String>,
    pub cache_ttl: Duration,
    /// `<= 0` disables rate limiting.
    pub rate_limit_rps: i64,
    pub upstream_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstreams = parse_upstreams(
            &lookup("UPSTREAMS").unwrap_or_else(|| DEFAULT_UPSTREAMS.to_string()),
        );
        let cache_ttl = Duration::from_secs(parse_or(
            &lookup,
            "CACHE_TTL",
            DEFAULT_CACHE_TTL_SECS,
        )?);
        let rate_limit_rps = parse_or(&lookup, "RATE_LIMIT_RPS", DEFAULT_RATE_LIMIT_RPS)?;

        let timeout_secs: u64 = parse_or(
            &lookup,
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        Ok(Self {
            upstreams,
            cache_ttl,
            rate_limit_rps,
            upstream_timeout: Duration::from_secs(timeout_secs),
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_upstreams(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().trim_end_matches('/'))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
