use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::EvalContext;

/// Snapshot of the tracking gate configuration.
///
/// Missing fields default to their neutral value (empty string, empty list,
/// no cookie), so a partial snapshot still evaluates; an unconfigured
/// tracking id simply denies every render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analytics tracking id. Empty means tracking is not configured and
    /// every evaluation denies.
    pub tracking_id: String,

    /// Name of the opt-out cookie. `None` disables the cookie check.
    pub blocking_cookie: Option<String>,

    /// Exact-match block list (raw address strings).
    pub blocked_ips: Vec<String>,

    /// Blocked range specs: `"<low>-<high>"` literals or one of
    /// `private`, `loopback`, `link-local`. Order is preserved.
    pub blocked_ranges: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let tracking_id = std::env::var("TRACKGATE_TRACKING_ID")
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let blocking_cookie = std::env::var("TRACKGATE_BLOCKING_COOKIE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let blocked_ips = std::env::var("TRACKGATE_BLOCKED_IPS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let blocked_ranges = std::env::var("TRACKGATE_BLOCKED_RANGES")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Ok(Config {
            tracking_id,
            blocking_cookie,
            blocked_ips,
            blocked_ranges,
        })
    }

    /// Load a JSON snapshot, e.g. for the operator CLI.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Build the engine's per-request snapshot from this configuration
    /// plus the request facts only the host knows.
    pub fn context(&self, admin_active: bool, cookie_present: bool) -> EvalContext {
        EvalContext {
            admin_active,
            tracking_id: self.tracking_id.clone(),
            blocking_cookie: if cookie_present {
                self.blocking_cookie.clone()
            } else {
                None
            },
            blocked_ips: self.blocked_ips.clone(),
            blocked_ranges: self.blocked_ranges.clone(),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
