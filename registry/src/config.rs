//! Configuration management for the registry front end.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that are missing or fail to parse fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,taxpayer_registry=debug,registry_runtime=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Registry backend connection
    pub backend: BackendConfig,
    /// Record table defaults
    pub table: TableConfig,
    /// Controller behavior
    pub controller: ControllerConfig,
    /// Log filter directive (`RUST_LOG`)
    pub log_filter: String,
}

/// Registry backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// HTTP base URL; `None` selects the in-memory backend
    pub url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Record table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page until the user picks another size
    pub rows_per_page: usize,
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// How overlapping list/search responses are resolved
    pub response_policy: ResponsePolicy,
    /// How long to wait for in-flight calls to settle, in seconds
    pub settle_timeout_secs: u64,
}

impl ControllerConfig {
    /// Settle timeout
    #[must_use]
    pub const fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_secs)
    }
}

/// How the controller treats list/search responses that overlap
///
/// Create outcomes are always applied: the backend change already happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponsePolicy {
    /// Apply a response only if it answers the most recent request
    #[default]
    LatestRequest,
    /// Apply every response in arrival order; the last to arrive wins
    LastWriteWins,
}

impl fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestRequest => f.write_str("latest-request"),
            Self::LastWriteWins => f.write_str("last-write-wins"),
        }
    }
}

impl FromStr for ResponsePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest-request" | "latest" => Ok(Self::LatestRequest),
            "last-write-wins" | "last-write" => Ok(Self::LastWriteWins),
            other => Err(format!("unknown response policy: {other}")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    ///
    /// `from_env` with the process environment swapped for `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            backend: BackendConfig {
                url: lookup("REGISTRY_BACKEND_URL").filter(|url| !url.trim().is_empty()),
                timeout_secs: parse_var::<u64, _>(&lookup, "REGISTRY_BACKEND_TIMEOUT_SECS")
                    .filter(|secs| *secs > 0)
                    .unwrap_or(30),
            },
            table: TableConfig {
                rows_per_page: parse_var::<usize, _>(&lookup, "REGISTRY_ROWS_PER_PAGE")
                    .filter(|rows| *rows > 0)
                    .unwrap_or(crate::table::DEFAULT_ROWS_PER_PAGE),
            },
            controller: ControllerConfig {
                response_policy: parse_var(&lookup, "REGISTRY_RESPONSE_POLICY").unwrap_or_default(),
                settle_timeout_secs: parse_var(&lookup, "REGISTRY_SETTLE_TIMEOUT_SECS").unwrap_or(10),
            },
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| value.trim().parse().ok())
}
