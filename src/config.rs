// src/config.rs
//! Runtime configuration: tracked keywords, dedup threshold, polling
//! interval, and notification switches.
//!
//! Loaded from TOML at startup (`MONITOR_CONFIG_PATH` override, then
//! `config/monitor.toml`); any failure falls back to the documented
//! defaults. The monitor snapshots the config once per cycle, so
//! runtime updates take effect on the next cycle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const ENV_CONFIG_PATH: &str = "MONITOR_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.8;
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Query terms tracked by the poll loop.
    pub keywords: Vec<String>,
    /// Fuzzy-title similarity threshold, clamped to `[0, 1]` on read.
    pub duplicate_threshold: f64,
    /// Starting polling interval; the controller adapts from here.
    pub check_interval_minutes: u64,
    pub notifications_enabled: bool,
    pub sound_enabled: bool,
    /// Feed language, e.g. "ko" or "en". Unset means "en".
    pub language: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            check_interval_minutes: DEFAULT_CHECK_INTERVAL_MINUTES,
            notifications_enabled: true,
            sound_enabled: false,
            language: None,
        }
    }
}

impl MonitorConfig {
    pub fn threshold(&self) -> f64 {
        self.duplicate_threshold.clamp(0.0, 1.0)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Env path override, then the default location, then defaults.
    pub fn load_default() -> Self {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        match Self::load_from(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = ?e, path = %path.display(), "config unavailable, using defaults");
                Self::default()
            }
        }
    }
}
