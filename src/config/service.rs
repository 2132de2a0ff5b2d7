//! HTTP service configuration, loaded from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SchedulerConfig;

/// Target used by `/createTask` when the caller does not name one.
pub const DEFAULT_RECAPTCHA_URL: &str = "https://www.google.com/recaptcha/api2/demo";
/// Site key paired with [`DEFAULT_RECAPTCHA_URL`].
pub const DEFAULT_RECAPTCHA_SITEKEY: &str = "6Le-wvkSAAAAAPBMRTvw0Q4Muexq9bi0DJwx_mJ-";
/// Where the HTTP solver adapter sends solve requests by default.
pub const DEFAULT_SOLVER_ENDPOINT: &str = "http://127.0.0.1:8191/solve";

/// Complete configuration of the service binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interface to bind.
    pub bind_addr: IpAddr,
    /// TCP port to listen on.
    pub port: u16,
    /// Accepted `clientKey` values.
    pub api_keys: Vec<String>,
    /// Default target page for `/createTask`.
    pub default_url: String,
    /// Default site key for `/createTask`.
    pub default_sitekey: String,
    /// Endpoint of the remote solving service.
    pub solver_endpoint: String,
    /// Per-request timeout towards the solving service, in seconds.
    pub solver_timeout_secs: u64,
    /// Scheduler settings.
    pub scheduler: SchedulerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            api_keys: Vec::new(),
            default_url: DEFAULT_RECAPTCHA_URL.to_string(),
            default_sitekey: DEFAULT_RECAPTCHA_SITEKEY.to_string(),
            solver_endpoint: DEFAULT_SOLVER_ENDPOINT.to_string(),
            solver_timeout_secs: 300,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment, reading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Malformed values or a configuration that fails validation.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or blank variables keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Malformed values or a configuration that fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(v) = get("BIND_ADDR") {
            cfg.bind_addr = parse("BIND_ADDR", &v)?;
        }
        if let Some(v) = get("PORT") {
            cfg.port = parse("PORT", &v)?;
        }
        if let Some(v) = get("VALID_API_KEYS") {
            cfg.api_keys = v
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = get("DEFAULT_RECAPTCHA_URL") {
            cfg.default_url = v;
        }
        if let Some(v) = get("DEFAULT_RECAPTCHA_SITEKEY") {
            cfg.default_sitekey = v;
        }
        if let Some(v) = get("SOLVER_ENDPOINT") {
            cfg.solver_endpoint = v;
        }
        if let Some(v) = get("SOLVER_TIMEOUT_SECS") {
            cfg.solver_timeout_secs = parse("SOLVER_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("MAX_PARALLEL_TASKS") {
            cfg.scheduler.max_parallel_tasks = parse("MAX_PARALLEL_TASKS", &v)?;
        }
        if let Some(v) = get("MAX_QUEUE_DEPTH") {
            cfg.scheduler.max_queue_depth = Some(parse("MAX_QUEUE_DEPTH", &v)?);
        }
        if let Some(v) = get("TASK_TTL_SECS") {
            cfg.scheduler.task_ttl_secs = parse("TASK_TTL_SECS", &v)?;
        }
        if let Some(v) = get("CLEANUP_INTERVAL_SECS") {
            cfg.scheduler.cleanup_interval_secs = parse("CLEANUP_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = get("INCLUDE_TIMINGS") {
            cfg.scheduler.include_timings = parse_bool("INCLUDE_TIMINGS", &v)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_keys.is_empty() {
            return Err("at least one API key must be configured (VALID_API_KEYS)".into());
        }
        if self.default_url.is_empty() || self.default_sitekey.is_empty() {
            return Err("default_url and default_sitekey must not be empty".into());
        }
        if self.solver_endpoint.is_empty() {
            return Err("solver_endpoint must not be empty".into());
        }
        if self.solver_timeout_secs == 0 {
            return Err("solver_timeout_secs must be greater than 0".into());
        }
        self.scheduler
            .validate()
            .map_err(|e| format!("scheduler invalid: {e}"))
    }

    /// Parse service configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Socket address to listen on.
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Timeout for one request to the solving service.
    pub const fn solver_timeout(&self) -> Duration {
        Duration::from_secs(self.solver_timeout_secs)
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("invalid {key} `{value}`: {e}"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("invalid {key} `{value}`: expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_every_variable() {
        let cfg = ServiceConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "8080"),
            ("VALID_API_KEYS", "alpha, beta,,gamma"),
            ("DEFAULT_RECAPTCHA_URL", "https://site.test/form"),
            ("DEFAULT_RECAPTCHA_SITEKEY", "site-key"),
            ("SOLVER_ENDPOINT", "http://solver.test/solve"),
            ("SOLVER_TIMEOUT_SECS", "45"),
            ("MAX_PARALLEL_TASKS", "3"),
            ("MAX_QUEUE_DEPTH", "100"),
            ("TASK_TTL_SECS", "120"),
            ("CLEANUP_INTERVAL_SECS", "30"),
            ("INCLUDE_TIMINGS", "false"),
        ]))
        .unwrap();

        assert_eq!(cfg.listen_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.api_keys, vec!["alpha", "beta", "gamma"]);
        assert_eq!(cfg.default_url, "https://site.test/form");
        assert_eq!(cfg.default_sitekey, "site-key");
        assert_eq!(cfg.solver_endpoint, "http://solver.test/solve");
        assert_eq!(cfg.solver_timeout(), Duration::from_secs(45));
        assert_eq!(cfg.scheduler.max_parallel_tasks, 3);
        assert_eq!(cfg.scheduler.max_queue_depth, Some(100));
        assert_eq!(cfg.scheduler.task_ttl_secs, 120);
        assert_eq!(cfg.scheduler.cleanup_interval_secs, 30);
        assert!(!cfg.scheduler.include_timings);
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = ServiceConfig::from_lookup(lookup(&[("VALID_API_KEYS", "k")])).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.default_url, DEFAULT_RECAPTCHA_URL);
        assert_eq!(cfg.default_sitekey, DEFAULT_RECAPTCHA_SITEKEY);
        assert_eq!(cfg.scheduler, SchedulerConfig::default());
    }

    #[test]
    fn missing_api_keys_is_an_error() {
        let err = ServiceConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.contains("API key"));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let err = ServiceConfig::from_lookup(lookup(&[
            ("VALID_API_KEYS", "k"),
            ("MAX_PARALLEL_TASKS", "many"),
        ]))
        .unwrap_err();
        assert!(err.contains("MAX_PARALLEL_TASKS"));
    }

    #[test]
    fn zero_parallelism_fails_validation() {
        let err = ServiceConfig::from_lookup(lookup(&[
            ("VALID_API_KEYS", "k"),
            ("MAX_PARALLEL_TASKS", "0"),
        ]))
        .unwrap_err();
        assert!(err.starts_with("scheduler invalid"));
    }
}
