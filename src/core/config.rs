use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Default records per archive page. The archive misbehaves on larger pages,
/// so every query is capped to this unless configured otherwise.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1000;

const ENV_ARCHIVE_URL: &str = "ARCHIVE_HISTORY_ARCHIVE_URL";
const ENV_INSTANCE: &str = "ARCHIVE_HISTORY_INSTANCE";
const ENV_MAX_PAGE_SIZE: &str = "ARCHIVE_HISTORY_MAX_PAGE_SIZE";
const ENV_BIND_ADDR: &str = "ARCHIVE_HISTORY_BIND_ADDR";
const ENV_REQUEST_TIMEOUT_MS: &str = "ARCHIVE_HISTORY_REQUEST_TIMEOUT_MS";
const ENV_AGGREGATE_KEYS: &str = "ARCHIVE_HISTORY_AGGREGATE_KEYS";
const ENV_IMAGE_KEYS: &str = "ARCHIVE_HISTORY_IMAGE_KEYS";
const ENV_ENUM_KEYS: &str = "ARCHIVE_HISTORY_ENUM_KEYS";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Archive server root, e.g. `http://localhost:8090`.
    pub archive_url: String,
    pub instance: String,
    pub max_page_size: usize,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub aggregate_keys: Vec<String>,
    pub image_keys: Vec<String>,
    pub enum_keys: Vec<String>,
}

impl ArchiveConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let archive_url = lookup(ENV_ARCHIVE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not set", ENV_ARCHIVE_URL))?;

        let instance = lookup(ENV_INSTANCE)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} is not set", ENV_INSTANCE))?;

        let max_page_size = match lookup(ENV_MAX_PAGE_SIZE) {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a positive integer", ENV_MAX_PAGE_SIZE))?,
            None => DEFAULT_MAX_PAGE_SIZE,
        };
        if max_page_size == 0 {
            return Err(anyhow!("{} must be greater than zero", ENV_MAX_PAGE_SIZE));
        }

        let bind_addr = lookup(ENV_BIND_ADDR)
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .with_context(|| format!("{} is not a socket address", ENV_BIND_ADDR))?;

        let timeout_ms = match lookup(ENV_REQUEST_TIMEOUT_MS) {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be milliseconds", ENV_REQUEST_TIMEOUT_MS))?,
            None => 30_000,
        };

        Ok(Self {
            archive_url: archive_url.trim().to_string(),
            instance: instance.trim().to_string(),
            max_page_size,
            bind_addr,
            request_timeout: Duration::from_millis(timeout_ms),
            aggregate_keys: split_keys(lookup(ENV_AGGREGATE_KEYS)),
            image_keys: split_keys(lookup(ENV_IMAGE_KEYS)),
            enum_keys: split_keys(lookup(ENV_ENUM_KEYS)),
        })
    }
}

fn split_keys(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_missing() {
        let cfg = ArchiveConfig::from_lookup(lookup_from(&[
            (ENV_ARCHIVE_URL, "http://archive:8090/"),
            (ENV_INSTANCE, "ops"),
        ]))
        .unwrap();

        assert_eq!(cfg.max_page_size, DEFAULT_MAX_PAGE_SIZE);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert!(cfg.enum_keys.is_empty());
    }

    #[test]
    fn key_lists_are_split_and_trimmed() {
        let cfg = ArchiveConfig::from_lookup(lookup_from(&[
            (ENV_ARCHIVE_URL, "http://archive:8090"),
            (ENV_INSTANCE, "ops"),
            (ENV_ENUM_KEYS, " ~sat~mode, ,~sat~state "),
            (ENV_MAX_PAGE_SIZE, "250"),
        ]))
        .unwrap();

        assert_eq!(cfg.enum_keys, vec!["~sat~mode", "~sat~state"]);
        assert_eq!(cfg.max_page_size, 250);
    }

    #[test]
    fn missing_instance_and_zero_page_size_are_rejected() {
        assert!(ArchiveConfig::from_lookup(lookup_from(&[(ENV_ARCHIVE_URL, "http://a")])).is_err());
        assert!(ArchiveConfig::from_lookup(lookup_from(&[
            (ENV_ARCHIVE_URL, "http://a"),
            (ENV_INSTANCE, "ops"),
            (ENV_MAX_PAGE_SIZE, "0"),
        ]))
        .is_err());
    }
}
