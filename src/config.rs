//! Server configuration from environment variables.
//!
//! `HOST` (default 0.0.0.0), `PORT` (default 8080), `RUST_LOG` (default info)
//! and `MATCH_TIME_SECS` (default timer duration, 120). Blank or unparseable
//! values fall back to the default.

use crate::timer::{MatchTimer, DEFAULT_DURATION_SECS};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub match_time_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_filter: "info".to_string(),
            match_time_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            host: value("HOST").unwrap_or(defaults.host),
            port: value("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            log_filter: value("RUST_LOG").unwrap_or(defaults.log_filter),
            match_time_secs: value("MATCH_TIME_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|secs| MatchTimer::new(*secs).is_ok())
                .unwrap_or(defaults.match_time_secs),
        }
    }
}
