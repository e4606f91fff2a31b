//! Application configuration from the environment.
//!
//! Every setting has a default, so the server starts with no environment at
//! all (against the public endpoint, without a subscription key). A variable
//! that is set but malformed aborts startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::cache::CacheConfig;
use crate::digitransit::DigitransitConfig;
use crate::planner::{PlannerConfig, StopSelection};

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set to something unusable
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub digitransit: DigitransitConfig,
    pub planner: PlannerConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,

    /// Serve canned fixtures from this directory instead of calling the API.
    pub mock_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if set.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(url) = get("DIGITRANSIT_API_URL") {
            config.digitransit = config.digitransit.with_base_url(url.trim());
        }

        if let Some(key) = get("DIGITRANSIT_SUBSCRIPTION_KEY") {
            config.digitransit = config.digitransit.with_subscription_key(key.trim());
        }

        config.mock_dir = get("DIGITRANSIT_MOCK_DIR").map(PathBuf::from);

        if let Some(value) = get("TRANSIT_TIMEZONE") {
            let tz: Tz = parse_var("TRANSIT_TIMEZONE", &value)?;
            config.planner = config.planner.with_timezone(tz);
        }

        if let Some(value) = get("MAX_ITINERARIES") {
            let n: usize = parse_var("MAX_ITINERARIES", &value)?;
            if n == 0 {
                return Err(invalid("MAX_ITINERARIES", &value, "must be at least 1"));
            }
            config.planner = config.planner.with_max_itineraries(n);
        }

        if let Some(value) = get("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = parse_var("UPSTREAM_TIMEOUT_SECS", &value)?;
            if secs == 0 {
                return Err(invalid("UPSTREAM_TIMEOUT_SECS", &value, "must be at least 1"));
            }
            config.digitransit = config.digitransit.with_timeout(secs);
            config.planner = config
                .planner
                .with_request_timeout(Duration::from_secs(secs));
        }

        if let Some(value) = get("STOP_SELECTION") {
            let selection: StopSelection = parse_var("STOP_SELECTION", &value)?;
            config.planner = config.planner.with_stop_selection(selection);
        }

        if let Some(value) = get("CACHE_TTL_SECS") {
            let secs: u64 = parse_var("CACHE_TTL_SECS", &value)?;
            config.cache = if secs == 0 {
                CacheConfig::disabled()
            } else {
                config.cache.with_ttl(Duration::from_secs(secs))
            };
        }

        if let Some(value) = get("BIND_ADDR") {
            config.server.bind_addr = parse_var("BIND_ADDR", &value)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, value, &e.to_string()))
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = from_vars(&[]).unwrap();

        assert_eq!(config.digitransit.base_url, crate::digitransit::DEFAULT_BASE_URL);
        assert!(config.digitransit.subscription_key.is_none());
        assert_eq!(config.planner.timezone, chrono_tz::Europe::Helsinki);
        assert_eq!(config.planner.max_itineraries, 5);
        assert!(config.cache.enabled);
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:3000");
        assert!(config.mock_dir.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = from_vars(&[
            ("DIGITRANSIT_API_URL", "http://localhost:8080/otp"),
            ("DIGITRANSIT_SUBSCRIPTION_KEY", "secret"),
            ("DIGITRANSIT_MOCK_DIR", "/tmp/fixtures"),
            ("TRANSIT_TIMEZONE", "Europe/Stockholm"),
            ("MAX_ITINERARIES", "3"),
            ("UPSTREAM_TIMEOUT_SECS", "10"),
            ("STOP_SELECTION", "first"),
            ("CACHE_TTL_SECS", "60"),
            ("BIND_ADDR", "0.0.0.0:8000"),
        ])
        .unwrap();

        assert_eq!(config.digitransit.base_url, "http://localhost:8080/otp");
        assert_eq!(config.digitransit.subscription_key.as_deref(), Some("secret"));
        assert_eq!(config.digitransit.timeout_secs, 10);
        assert_eq!(config.mock_dir, Some(PathBuf::from("/tmp/fixtures")));
        assert_eq!(config.planner.timezone, chrono_tz::Europe::Stockholm);
        assert_eq!(config.planner.max_itineraries, 3);
        assert_eq!(config.planner.request_timeout, Duration::from_secs(10));
        assert_eq!(config.planner.stop_selection, StopSelection::First);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.server.bind_addr.port(), 8000);
    }

    #[test]
    fn zero_ttl_disables_cache() {
        let config = from_vars(&[("CACHE_TTL_SECS", "0")]).unwrap();
        assert!(!config.cache.enabled);
    }

    #[test]
    fn empty_values_are_unset() {
        let config = from_vars(&[("DIGITRANSIT_SUBSCRIPTION_KEY", ""), ("MAX_ITINERARIES", " ")]).unwrap();
        assert!(config.digitransit.subscription_key.is_none());
        assert_eq!(config.planner.max_itineraries, 5);
    }

    #[test]
    fn malformed_values_rejected() {
        for (var, value) in [
            ("TRANSIT_TIMEZONE", "Mars/Olympus"),
            ("MAX_ITINERARIES", "five"),
            ("MAX_ITINERARIES", "0"),
            ("UPSTREAM_TIMEOUT_SECS", "-1"),
            ("STOP_SELECTION", "best"),
            ("CACHE_TTL_SECS", "soon"),
            ("BIND_ADDR", "localhost"),
        ] {
            let err = from_vars(&[(var, value)]).unwrap_err();
            let ConfigError::Invalid { var: got, .. } = err;
            assert_eq!(got, var);
        }
    }
}
