//! Configuration structures.
//!
//! Configuration is loaded from environment variables or a JSON config file and
//! supplied once at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::{Error, Result};

/// Sentinel toolset name that enables every registered toolset.
pub const ALL_TOOLSETS: &str = "all";

/// Prefix shared by every environment variable this crate reads.
pub const ENV_PREFIX: &str = "TOOLSETS_";

/// Global configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Which toolsets start enabled, and the group-wide switches.
    #[serde(default)]
    pub toolsets: ToolsetsConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Startup toolset selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsetsConfig {
    /// Toolset names to enable at startup, or `["all"]`.
    pub enabled: Vec<String>,

    /// Hide every write tool regardless of per-toolset enablement.
    pub read_only: bool,

    /// Expose the dynamic toolset so the agent can enable toolsets itself.
    pub dynamic: bool,
}

impl Default for ToolsetsConfig {
    fn default() -> Self {
        Self {
            enabled: vec![ALL_TOOLSETS.to_string()],
            read_only: false,
            dynamic: false,
        }
    }
}

impl ToolsetsConfig {
    /// Names to pass to `ToolsetGroup::enable_toolsets` at startup.
    ///
    /// In dynamic mode `"all"` is dropped: the agent discovers and enables
    /// toolsets on demand instead of starting with the whole catalog.
    pub fn startup_toolsets(&self) -> Vec<String> {
        if !self.dynamic {
            return self.enabled.clone();
        }
        self.enabled
            .iter()
            .filter(|name| name.as_str() != ALL_TOOLSETS)
            .cloned()
            .collect()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Load configuration from `TOOLSETS_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));
        let mut config = Config::default();

        if let Some(raw) = var("ENABLED") {
            config.toolsets.enabled = parse_name_list(&raw);
        }
        if let Some(raw) = var("READ_ONLY") {
            config.toolsets.read_only = parse_bool("READ_ONLY", &raw)?;
        }
        if let Some(raw) = var("DYNAMIC") {
            config.toolsets.dynamic = parse_bool("DYNAMIC", &raw)?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.observability.log_level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            config.observability.json_logs = format.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }

    /// Load configuration from a JSON file. Missing sections keep defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("invalid config file {}: {}", path.display(), e))
        })
    }
}

fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::configuration(format!(
            "{ENV_PREFIX}{field} must be a boolean, got '{other}'"
        ))),
    }
}
