//! Application configuration.
//!
//! Loaded from ./.icebreakr.yml or ~/.config/icebreakr/icebreakr.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use icebreakr::domain::FilterCriteria;
use icebreakr::engage::EngagementLoopConfig;

/// Top-level configuration for the icebreakr daemon.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Loop timing.
    pub engine: EngineConfig,

    /// Discoverability preference.
    pub settings: SettingsConfig,

    /// Default filter criteria for nearby queries.
    pub filter: FilterCriteria,

    /// Profile seed file for the in-memory directory.
    pub seed: Option<PathBuf>,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .icebreakr.yml in current directory
    /// 3. ~/.config/icebreakr/icebreakr.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(".icebreakr.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .icebreakr.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .icebreakr.yml: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("icebreakr").join("icebreakr.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        if self.filter.radius_m == 0 {
            eyre::bail!("filter.radius-m must be > 0");
        }
        if let Some(range) = &self.filter.age_range {
            if range.min > range.max {
                eyre::bail!("filter.age-range min must be <= max");
            }
        }
        Ok(())
    }
}

/// Loop timing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between proximity checks.
    #[serde(rename = "period-secs")]
    pub period_secs: u64,

    /// Seconds before a peer can be renotified.
    #[serde(rename = "cooldown-secs")]
    pub cooldown_secs: u64,

    /// Ledger entries older than this multiple of the cooldown are evicted;
    /// 0 keeps entries forever.
    #[serde(rename = "sweep-factor")]
    pub sweep_factor: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            period_secs: 60,
            cooldown_secs: 4 * 3600,
            sweep_factor: 4,
        }
    }
}

impl EngineConfig {
    /// Validate the timing values. Checked again after CLI overrides are
    /// applied, since those bypass the config file load.
    pub fn validate(&self) -> Result<()> {
        if self.period_secs == 0 {
            eyre::bail!("engine.period-secs must be > 0");
        }
        if self.cooldown_secs == 0 {
            eyre::bail!("engine.cooldown-secs must be > 0");
        }
        Ok(())
    }

    /// Replace timing values with CLI overrides, where given.
    pub fn apply_overrides(&mut self, period_secs: Option<u64>, cooldown_secs: Option<u64>) {
        if let Some(secs) = period_secs {
            self.period_secs = secs;
        }
        if let Some(secs) = cooldown_secs {
            self.cooldown_secs = secs;
        }
    }

    /// Convert into the engine's loop configuration.
    pub fn loop_config(&self) -> EngagementLoopConfig {
        EngagementLoopConfig::new(
            Duration::from_secs(self.period_secs),
            Duration::from_secs(self.cooldown_secs),
        )
        .with_sweep_factor(self.sweep_factor)
    }
}

/// Discoverability preference.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Whether the local user participates in proximity checks.
    pub discoverable: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self { discoverable: true }
    }
}
