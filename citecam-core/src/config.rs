//! Runtime configuration
//!
//! Values come from `CITECAM_*` environment variables; front ends may
//! override individual fields afterwards.

use crate::error::{CiteCamError, Result};
use crate::lookup::GOOGLE_BOOKS_VOLUMES_URL;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory holding the persisted lists
pub const DEFAULT_DATA_DIR: &str = "./citecam_data";

/// Default bound on each upstream request
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

/// Headroom added on top of the request bounds for a whole resolution
pub const RESOLUTION_SLACK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `citations.json` and `pending.json` (`CITECAM_DATA_DIR`)
    pub data_dir: PathBuf,

    /// Volumes endpoint queried with `?q=isbn:<isbn>` (`CITECAM_LOOKUP_URL`)
    pub lookup_endpoint: String,

    /// Upper bound on each upstream request, metadata query and cover download
    /// alike (`CITECAM_LOOKUP_TIMEOUT_SECS`)
    pub lookup_timeout: Duration,

    /// `User-Agent` sent upstream (`CITECAM_USER_AGENT`)
    pub user_agent: String,

    /// Recipient for exported citation mail (`CITECAM_MAIL_TO`)
    pub mail_recipient: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            lookup_endpoint: GOOGLE_BOOKS_VOLUMES_URL.to_string(),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            user_agent: format!("citecam/{}", env!("CARGO_PKG_VERSION")),
            mail_recipient: None,
        }
    }
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty("CITECAM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = non_empty("CITECAM_LOOKUP_URL") {
            config.lookup_endpoint = url;
        }
        if let Some(secs) = non_empty("CITECAM_LOOKUP_TIMEOUT_SECS") {
            config.lookup_timeout = parse_timeout(&secs)?;
        }
        if let Some(agent) = non_empty("CITECAM_USER_AGENT") {
            config.user_agent = agent;
        }
        config.mail_recipient = non_empty("CITECAM_MAIL_TO");

        Ok(config)
    }

    /// Bound for a whole resolution: metadata query plus cover download plus slack
    ///
    /// A slow cover falls back to the placeholder before this expires.
    pub fn resolution_timeout(&self) -> Duration {
        self.lookup_timeout * 2 + RESOLUTION_SLACK
    }
}

/// Parse a whole number of seconds; zero is rejected
pub fn parse_timeout(secs: &str) -> Result<Duration> {
    let secs: u64 = secs
        .trim()
        .parse()
        .map_err(|_| CiteCamError::Config(format!("'{}' is not a valid number of seconds", secs)))?;
    if secs == 0 {
        return Err(CiteCamError::Config(
            "lookup timeout must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lookup_endpoint, GOOGLE_BOOKS_VOLUMES_URL);
        assert!(config.mail_recipient.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("CITECAM_DATA_DIR", "/tmp/cites"),
            ("CITECAM_LOOKUP_URL", "http://127.0.0.1:9/volumes"),
            ("CITECAM_LOOKUP_TIMEOUT_SECS", "3"),
            ("CITECAM_MAIL_TO", "me@example.com"),
            ("CITECAM_USER_AGENT", " "),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/cites"));
        assert_eq!(config.lookup_endpoint, "http://127.0.0.1:9/volumes");
        assert_eq!(config.lookup_timeout, Duration::from_secs(3));
        assert_eq!(config.mail_recipient.as_deref(), Some("me@example.com"));
        assert!(config.user_agent.starts_with("citecam/"));
    }

    #[test]
    fn test_resolution_timeout_covers_both_requests() {
        let config = Config::from_vars(vars(&[("CITECAM_LOOKUP_TIMEOUT_SECS", "1")])).unwrap();
        assert_eq!(config.resolution_timeout(), Duration::from_secs(3));
        assert!(config.resolution_timeout() > config.lookup_timeout * 2);
    }

    #[test]
    fn test_bad_timeout() {
        assert!(Config::from_vars(vars(&[("CITECAM_LOOKUP_TIMEOUT_SECS", "soon")])).is_err());
        assert!(parse_timeout("0").is_err());
    }
}
