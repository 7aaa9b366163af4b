//! Application configuration.
//!
//! A TOML file layered with `ROULETTE__`-prefixed environment overrides,
//! e.g. `ROULETTE__REPORT__RENDER_MODE=static`.

use crate::error::{AppError, AppResult};
use roulette_analysis::DEFAULT_BIN_TARGET;
use roulette_persistence::DEFAULT_CHUNK_SIZE;
use roulette_report::ReportConfig;
use roulette_sim::SimConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file used when neither the CLI nor `ROULETTE_CONFIG` names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "ROULETTE_CONFIG";

const ENV_PREFIX: &str = "ROULETTE";
const ENV_SEPARATOR: &str = "__";

/// Bet log input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
    /// Rows per read chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("roulette_log.csv")
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Trend chart downsampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_bin_target")]
    pub bin_target: usize,
}

fn default_bin_target() -> usize {
    DEFAULT_BIN_TARGET
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            bin_target: default_bin_target(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Draw progress bars when stderr is a terminal.
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_progress() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            progress: default_progress(),
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The default file was absent; built-in defaults plus env overrides.
    Defaults(PathBuf),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!(path = %path.display(), "Config file loaded"),
            ConfigSource::Defaults(path) => {
                warn!(path = %path.display(), "Config file not found, using defaults")
            }
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub sim: SimConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Resolve the config path (CLI > `ROULETTE_CONFIG` > default) and load it.
    ///
    /// An explicitly named file must exist; a missing default file falls
    /// back to built-in defaults. Nothing is logged here since this runs
    /// before the subscriber exists; call [`ConfigSource::log`] afterwards.
    pub fn load(cli_path: Option<&Path>) -> AppResult<(Self, ConfigSource)> {
        let explicit = cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        match explicit {
            Some(path) => {
                let config = Self::from_file(&path, true)?;
                Ok((config, ConfigSource::File(path)))
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                let config = Self::from_file(&path, false)?;
                let source = if path.exists() {
                    ConfigSource::File(path)
                } else {
                    ConfigSource::Defaults(path)
                };
                Ok((config, source))
            }
        }
    }

    /// Load `path` and apply environment overrides.
    pub fn from_file(path: &Path, required: bool) -> AppResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.input.chunk_size == 0 {
            return Err(AppError::Config("input.chunk_size must be positive".to_string()));
        }
        if self.aggregation.bin_target == 0 {
            return Err(AppError::Config(
                "aggregation.bin_target must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
