// src/config.rs

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::arb::config::ScanConfig;
use crate::arb::Thresholds;
use crate::tier::TierLimits;


/// Top-level service configuration loaded from `config/price_arb.toml`.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub thresholds: Thresholds,
    pub scan: ScanConfig,
    pub tiers: TierLimits,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:5000".into() }
    }
}

/// Simulated repricing of the catalog.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub enabled: bool,
    pub interval_ms: u64,
    /// Largest per-tick move away from the base price, in percent.
    pub max_drift_pct: f64,
    /// Fixed seed for reproducible runs. Seeded from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 5000,
            max_drift_pct: 2.0,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}


impl AppConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the config file, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !t.min_profit.is_finite() || !t.min_profit_pct.is_finite() {
            bail!("thresholds must be finite numbers");
        }
        if !(0.0..100.0).contains(&self.feed.max_drift_pct) {
            bail!("feed.max_drift_pct must be in [0, 100), got {}", self.feed.max_drift_pct);
        }
        if self.feed.interval_ms == 0 {
            bail!("feed.interval_ms must be greater than zero");
        }
        Ok(())
    }
}
