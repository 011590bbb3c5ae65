//! Project configuration at `.estima/config.toml`.

use crate::money::Money;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rates: RatesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Per-role default-rate overrides in whole currency units, keyed by
    /// role name (matched case-insensitively).
    #[serde(default)]
    pub overrides: BTreeMap<String, i64>,
}

impl RatesConfig {
    /// Overrides keyed case-folded, as [`crate::reconcile::default_rate`]
    /// expects.
    #[must_use]
    pub fn override_map(&self) -> BTreeMap<String, Money> {
        self.overrides
            .iter()
            .map(|(name, units)| (name.trim().to_lowercase(), Money::from_units(*units)))
            .collect()
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

const fn default_poll_interval_secs() -> u64 {
    2
}

impl ProjectConfig {
    /// Effective API base URL: `ESTIMA_API_URL` env wins over config.
    #[must_use]
    pub fn resolved_base_url(&self) -> String {
        std::env::var("ESTIMA_API_URL")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.api.base_url.clone())
    }
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".estima/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write the default config file; used by `est init`. Leaves an existing
/// file alone.
pub fn write_default_config(project_root: &Path) -> Result<()> {
    let dir = project_root.join(".estima");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join("config.toml");
    if path.exists() {
        return Ok(());
    }

    let content = toml::to_string_pretty(&ProjectConfig::default())
        .context("Failed to encode default config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
