//! ---
//! cbs_section: "01-core-functionality"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Shared configuration and tracing primitives."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_breaking_capacity_ka() -> Decimal {
    dec!(10)
}

fn default_voltage_drop_temperature_c() -> Decimal {
    dec!(75)
}

fn default_upsize_limit_percent() -> Decimal {
    dec!(3.0)
}

fn default_cache_capacity() -> usize {
    64
}

fn default_calculation_version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for CBS tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "CBS_CONFIG";

    /// Load configuration from disk, respecting the `CBS_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Load from the candidates, falling back to defaults when none exist.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        let env_set = std::env::var(Self::ENV_CONFIG_PATH)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);
        if !env_set && !candidates.iter().any(|c| c.as_ref().exists()) {
            debug!("no configuration file present, using defaults");
            return Ok(Self::default());
        }
        Self::load(candidates)
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Tunables of the calculation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Breaking capacity assumed when the caller does not choose a breaker explicitly.
    #[serde(default = "default_breaking_capacity_ka")]
    pub default_breaking_capacity_ka: Decimal,
    /// Conductor operating temperature used for the resistance correction.
    #[serde(default = "default_voltage_drop_temperature_c")]
    pub voltage_drop_temperature_c: Decimal,
    /// Voltage drop (percent) above which a larger conductor is searched for.
    #[serde(default = "default_upsize_limit_percent")]
    pub upsize_limit_percent: Decimal,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_calculation_version")]
    pub calculation_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_breaking_capacity_ka: default_breaking_capacity_ka(),
            voltage_drop_temperature_c: default_voltage_drop_temperature_c(),
            upsize_limit_percent: default_upsize_limit_percent(),
            cache_capacity: default_cache_capacity(),
            calculation_version: default_calculation_version(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_breaking_capacity_ka <= Decimal::ZERO {
            return Err(anyhow!(
                "engine.default_breaking_capacity_ka must be positive (got {})",
                self.default_breaking_capacity_ka
            ));
        }
        if self.upsize_limit_percent <= Decimal::ZERO || self.upsize_limit_percent > dec!(5) {
            return Err(anyhow!(
                "engine.upsize_limit_percent must be within (0, 5] (got {})",
                self.upsize_limit_percent
            ));
        }
        if self.cache_capacity == 0 {
            return Err(anyhow!("engine.cache_capacity must be at least 1"));
        }
        if self.calculation_version.trim().is_empty() {
            return Err(anyhow!("engine.calculation_version cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}
