//! Serializable analysis configuration.
//!
//! Everything the pipeline needs is passed in through `AppConfig`; nothing in
//! the core reads environment variables or process globals.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Symbols analysed on each run.
    pub symbols: Vec<String>,
    pub indicators: IndicatorConfig,
    pub data: DataConfig,
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTCUSDT".to_string()],
            indicators: IndicatorConfig::default(),
            data: DataConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid("at least one symbol is required".into()));
        }
        self.indicators.validate()?;
        let needed = self.indicators.min_daily_len();
        if self.data.daily_limit < needed {
            return Err(ConfigError::Invalid(format!(
                "data.daily_limit {} is below the {needed} candles the indicators need",
                self.data.daily_limit
            )));
        }
        let needed = self.indicators.min_h4_len();
        if self.data.h4_limit < needed {
            return Err(ConfigError::Invalid(format!(
                "data.h4_limit {} is below the {needed} candles the indicators need",
                self.data.h4_limit
            )));
        }
        Ok(())
    }
}

/// Indicator periods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub swing_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            rsi_period: 14,
            atr_period: 14,
            swing_lookback: 60,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("rsi_period", self.rsi_period),
            ("atr_period", self.atr_period),
            ("swing_lookback", self.swing_lookback),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("indicators.{name} must be >= 1")));
            }
        }
        if self.ema_fast >= self.ema_slow {
            return Err(ConfigError::Invalid(format!(
                "indicators.ema_fast ({}) must be shorter than ema_slow ({})",
                self.ema_fast, self.ema_slow
            )));
        }
        Ok(())
    }

    /// Candles needed by a 4-hour snapshot.
    pub fn min_h4_len(&self) -> usize {
        self.ema_fast
            .max(self.ema_slow)
            .max(self.rsi_period + 1)
            .max(self.atr_period + 1)
    }

    /// Candles needed on the daily series (snapshot plus swing bands).
    pub fn min_daily_len(&self) -> usize {
        self.min_h4_len().max(self.swing_lookback)
    }
}

/// Where candles come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Binance,
    Csv,
}

/// Market data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSource,
    pub base_url: String,
    pub csv_dir: PathBuf,
    pub daily_limit: usize,
    pub h4_limit: usize,
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Binance,
            base_url: "https://api.binance.com".to_string(),
            csv_dir: PathBuf::from("data"),
            daily_limit: 220,
            h4_limit: 220,
            timeout_secs: 15,
        }
    }
}

/// Rendering format for reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
        }
    }
}
