//! # Configuration
//!
//! Settings come from an optional `phasewise.toml`, then environment
//! overrides, then CLI flags.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100          # requests/second, 0 disables
//! cors_origins = "*"        # or a comma-separated list
//!
//! [policy]
//! content_min_chars = 10
//! concept_complete_threshold = 70
//!
//! [strategy]
//! plan_path = "strategic_plan.json"
//! ```
//!
//! ## Environment Variables
//!
//! - `PHASEWISE_RATE_LIMIT`: overrides `server.rate_limit`
//! - `PHASEWISE_CORS_ORIGINS`: overrides `server.cors_origins`

use phasewise_core::{CompletionPolicy, PhasewiseError, StaticPlan, StrategicPlan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "phasewise.toml";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Maximum config or plan file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit: u32,
    /// `None` means localhost only.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

/// `[strategy]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// JSON strategic plan; the built-in plan is used when unset.
    pub plan_path: Option<PathBuf>,
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub policy: CompletionPolicy,
    pub strategy: StrategyConfig,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, PhasewiseError> {
        toml::from_str(text).map_err(|e| PhasewiseError::Config(e.to_string()))
    }

    /// Load a config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, PhasewiseError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = read_limited(path)?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply `PHASEWISE_RATE_LIMIT` and `PHASEWISE_CORS_ORIGINS`.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var("PHASEWISE_RATE_LIMIT").ok().as_deref(),
            std::env::var("PHASEWISE_CORS_ORIGINS").ok().as_deref(),
        )
    }

    /// Apply override values. An unparsable rate limit is ignored.
    #[must_use]
    pub fn with_overrides(mut self, rate_limit: Option<&str>, cors_origins: Option<&str>) -> Self {
        if let Some(raw) = rate_limit {
            match raw.trim().parse() {
                Ok(rps) => self.server.rate_limit = rps,
                Err(_) => tracing::warn!(value = raw, "ignoring invalid PHASEWISE_RATE_LIMIT"),
            }
        }
        if let Some(origins) = cors_origins {
            self.server.cors_origins = Some(origins.to_string());
        }
        self
    }

    /// The strategic plan named by `[strategy] plan_path`, or the built-in one.
    pub fn plan(&self) -> Result<StaticPlan, PhasewiseError> {
        match &self.strategy.plan_path {
            Some(path) => {
                let text = read_limited(path)?;
                Ok(StaticPlan::new(StrategicPlan::from_json(&text)?))
            }
            None => Ok(StaticPlan::builtin()),
        }
    }
}

fn read_limited(path: &Path) -> Result<String, PhasewiseError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| PhasewiseError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(PhasewiseError::Config(format!(
            "File '{}' is {} bytes, maximum is {}",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }
    std::fs::read_to_string(path)
        .map_err(|e| PhasewiseError::Io(format!("Cannot read '{}': {}", path.display(), e)))
}

// =============================================================================
// TESTS
// =============================================================================
