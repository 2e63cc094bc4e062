use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domains::placement::{AccessPolicy, PlacementConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub overpass: OverpassConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write domain log lines to this file (via fast_log).
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 15,
            user_agent: concat!("plotcheck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.overpass.timeout_secs == 0 {
            bail!("overpass.timeout_secs must be positive");
        }
        for (name, limit) in &self.placement.building_limits {
            if !(limit.is_finite() && *limit > 0.0) {
                bail!("building limit for '{}' must be positive, got {}", name, limit);
            }
        }
        if self.placement.rules.obstructions.iter().any(|r| r.reason.is_empty()) {
            bail!("obstruction rules need a non-empty reason");
        }
        let s = &self.placement.settings;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !non_negative(s.search_margin_m) || !non_negative(s.bridge_buffer_m) {
            bail!("search margin and bridge buffer must be non-negative");
        }
        if !non_negative(s.line_buffer_deg) || s.line_buffer_deg == 0.0 {
            bail!("line_buffer_deg must be positive");
        }
        if let AccessPolicy::WithinDistance { meters } = s.access {
            if !(meters.is_finite() && meters > 0.0) {
                bail!("access distance must be positive, got {}", meters);
            }
        }
        Ok(())
    }
}
