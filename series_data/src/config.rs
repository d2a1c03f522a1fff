//! Configuration management for the engine.
//!
//! Loads configuration from TOML files. Every field has a default, so a
//! partial file only overrides what it names.

use crate::timeframe::Timeframe;
use crate::transform::CalculationType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up by [`EngineConfig::load_default`]
pub const DEFAULT_CONFIG_FILE: &str = "macro_lens.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub general: GeneralConfig,
    pub formula: FormulaConfig,
    pub display: DisplayConfig,
}

impl EngineConfig {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `./macro_lens.toml`, falling back to defaults.
    pub fn load_default() -> Self {
        match Self::load(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::ReadError(_)) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring {}: {}", DEFAULT_CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Pipeline defaults for a new workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Timeframe series are aggregated to
    pub timeframe: Timeframe,
    /// Calculation type applied for display
    pub calculation: CalculationType,
    /// Rescale overlays onto the primary series' range
    pub normalize_overlays: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::Daily,
            calculation: CalculationType::Value,
            normalize_overlays: true,
        }
    }
}

/// Formula evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaConfig {
    /// Period used by `RSI(X)` without an explicit period
    pub rsi_period: usize,
    /// Maximum nesting depth of a formula expression
    pub max_depth: usize,
    /// Prefix of identifiers given to formula series
    pub id_prefix: String,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            rsi_period: series_math::DEFAULT_RSI_PERIOD,
            max_depth: 32,
            id_prefix: "formula".to_string(),
        }
    }
}

/// Display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colours assigned round-robin to new series
    pub palette: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            palette: [
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
                "#7f7f7f",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl DisplayConfig {
    /// Colour for the `index`-th series
    pub fn color_for(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return crate::model::DEFAULT_COLOR.to_string();
        }
        self.palette[index % self.palette.len()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[general]").unwrap();
        writeln!(file, "timeframe = \"quarterly\"").unwrap();
        writeln!(file, "calculation = \"year-to-year-percent\"").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.general.timeframe, Timeframe::Quarterly);
        assert_eq!(config.general.calculation, CalculationType::YearToYearPercent);
        assert!(config.general.normalize_overlays);
        assert_eq!(config.formula.rsi_period, 14);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = EngineConfig::default();
        config.formula.rsi_period = 9;
        config.display.palette = vec!["#000000".to_string()];

        config.save(file.path()).unwrap();
        let loaded = EngineConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[general]\ntimeframe = \"hourly\"").unwrap();
        assert!(matches!(
            EngineConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_palette_wraps() {
        let display = DisplayConfig {
            palette: vec!["#111111".to_string(), "#222222".to_string()],
        };
        assert_eq!(display.color_for(3), "#222222");
        assert_eq!(DisplayConfig { palette: vec![] }.color_for(0), crate::model::DEFAULT_COLOR);
    }
}
