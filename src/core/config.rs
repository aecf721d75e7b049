//! Backend configuration for saferoute
//!
//! Holds the base URL of the routing backend, the time-zone function URL and
//! the timeout budgets. The heatmap endpoint gets its own, much longer budget.

use std::time::Duration;

use crate::core::error::{Error, Result};

/// Base URL of the routing/safety backend
pub const DEFAULT_BASE_URL: &str = "http://54.206.78.199:5000";

/// Day/night classification function
pub const DEFAULT_TIME_ZONE_URL: &str =
    "https://us-central1-cobalt-baton-448207-q9.cloudfunctions.net/getTimeZone";

/// Search radius around each path point for heatmap aggregation
pub const DEFAULT_HEATMAP_RADIUS_M: u32 = 400;

/// Configuration for backend calls
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the routing backend
    pub base_url: String,

    /// Full URL of the time-zone function
    pub time_zone_url: String,

    /// Per-call timeout for node, time-context and route requests
    pub request_timeout: Duration,

    /// Per-call timeout for the heatmap request
    pub heatmap_timeout: Duration,

    /// Radius sent with heatmap requests, in meters
    pub heatmap_radius_m: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            time_zone_url: DEFAULT_TIME_ZONE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            heatmap_timeout: Duration::from_secs(240),
            heatmap_radius_m: DEFAULT_HEATMAP_RADIUS_M,
        }
    }
}

impl BackendConfig {
    /// Defaults overlaid with `SAFEROUTE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SAFEROUTE_BASE_URL") {
            config.base_url = url;
        }
        if let Some(url) = lookup("SAFEROUTE_TIMEZONE_URL") {
            config.time_zone_url = url;
        }
        if let Some(secs) = lookup("SAFEROUTE_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("SAFEROUTE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("SAFEROUTE_HEATMAP_TIMEOUT_SECS") {
            config.heatmap_timeout = parse_secs("SAFEROUTE_HEATMAP_TIMEOUT_SECS", &secs)?;
        }

        Ok(config)
    }

    /// Same configuration pointed at another backend
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn node_url(&self) -> String {
        endpoint(&self.base_url, "find_or_create_node")
    }

    pub fn route_url(&self) -> String {
        endpoint(&self.base_url, "find_route")
    }

    pub fn heatmap_url(&self) -> String {
        endpoint(&self.base_url, "safety_heatmap_batch")
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::InvalidInput(format!("{key} must be a whole number of seconds, got '{value}'")))
}
