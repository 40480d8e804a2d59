//! CLI configuration: a TOML file with environment-variable overrides.
//!
//! Resolution order for each setting: explicit file (`--config` or
//! `SCOUT_CONFIG`), then environment variables, then defaults. Runs
//! without any configuration at all: unconfigured sources degrade to
//! neutral values and state lives in memory.

use anyhow::Context;
use scout_core::constants::{DEFAULT_MAX_LONG_TAILS, DEFAULT_REGION, WARMUP_HOUR_UTC};
use scout_core::runtime::{MemoryStateStore, StateStore};
use scout_core::ScoutConfig;
use scout_sources::SourcesConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SCOUT_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Directory for the redb slot store; in-memory state when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    #[serde(default = "default_region")]
    pub default_region: String,
    #[serde(default = "default_warmup_hour")]
    pub warmup_hour_utc: u32,
    #[serde(default = "default_max_long_tails")]
    pub max_long_tails: usize,
    #[serde(default)]
    pub sources: SourcesConfig,
}

fn default_regions() -> Vec<String> {
    vec![DEFAULT_REGION.to_string()]
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_warmup_hour() -> u32 {
    WARMUP_HOUR_UTC
}

fn default_max_long_tails() -> usize {
    DEFAULT_MAX_LONG_TAILS
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            regions: default_regions(),
            default_region: default_region(),
            warmup_hour_utc: default_warmup_hour(),
            max_long_tails: default_max_long_tails(),
            sources: SourcesConfig::default(),
        }
    }
}

/// Load configuration from `path`, the `SCOUT_CONFIG` file, or defaults,
/// then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CliConfig> {
    let resolved = match path {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::var_os(CONFIG_ENV).map(PathBuf::from),
    };

    let mut config = match resolved {
        Some(file) => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading config file {}", file.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("parsing config file {}", file.display()))?
        }
        None => CliConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut CliConfig) {
    if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
        if !key.is_empty() {
            config.sources.youtube_api_key = Some(key);
        }
    }
    if let Ok(keys) = std::env::var("ADS_API_KEYS") {
        let parsed: Vec<String> = keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if !parsed.is_empty() {
            config.sources.ads_api_keys = parsed;
        }
    }
    if let Ok(dir) = std::env::var("SCOUT_DATA_DIR") {
        if !dir.is_empty() {
            config.data_dir = Some(PathBuf::from(dir));
        }
    }
}

fn validate(config: &CliConfig) -> anyhow::Result<()> {
    anyhow::ensure!(
        config.warmup_hour_utc < 24,
        "warmup_hour_utc must be 0-23, got {}",
        config.warmup_hour_utc
    );
    anyhow::ensure!(!config.regions.is_empty(), "at least one region required");
    anyhow::ensure!(config.max_long_tails > 0, "max_long_tails must be positive");
    Ok(())
}

impl CliConfig {
    pub fn scout_config(&self) -> ScoutConfig {
        ScoutConfig {
            default_region: self.default_region.clone(),
            regions: self.regions.clone(),
            warmup_hour_utc: self.warmup_hour_utc,
            max_long_tails: self.max_long_tails,
        }
    }

    /// Open the slot store: redb under `data_dir`, else in-memory.
    pub async fn open_store(&self) -> anyhow::Result<Arc<dyn StateStore>> {
        match &self.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating data dir {}", dir.display()))?;
                let store = scout_storage_redb::RedbStateStore::open(&dir.join("scout.redb"))
                    .await
                    .context("opening redb slot store")?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(MemoryStateStore::new())),
        }
    }
}
