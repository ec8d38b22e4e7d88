//! Configuration loading for indicator presets.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use rill_indicators::{IndicatorSpec, Preset};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Prefix of environment variables layered over the configuration file.
pub const ENV_PREFIX: &str = "RILL";

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RillConfig {
    /// Indicator descriptions keyed by output name.
    #[serde(default)]
    pub indicators: BTreeMap<String, IndicatorSpec>,
}

impl RillConfig {
    /// Parses a configuration from TOML text without consulting the environment.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse rill configuration")
    }

    /// Validates every indicator and returns them as a [`Preset`].
    pub fn preset(&self) -> Result<Preset> {
        let mut preset = Preset::new();
        for (name, spec) in &self.indicators {
            spec.build()
                .with_context(|| format!("invalid indicator '{name}' ({})", spec.kind()))?;
            preset.insert(name.clone(), spec.clone());
        }
        Ok(preset)
    }
}

/// Loads a TOML configuration file, then applies `RILL__`-prefixed environment
/// overrides such as `RILL__INDICATORS__FAST__PERIOD=9`.
pub fn load_config(path: impl AsRef<Path>) -> Result<RillConfig> {
    let path = path.as_ref();
    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    let config: RillConfig = settings
        .try_deserialize()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    if config.indicators.is_empty() {
        warn!(path = %path.display(), "configuration defines no indicators");
    }
    info!(
        path = %path.display(),
        indicators = config.indicators.len(),
        "loaded rill configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_tagged_indicator_tables() {
        let config = RillConfig::from_toml_str(
            r#"
            [indicators.fast]
            kind = "ema"
            period = 12

            [indicators.bands]
            kind = "bbands"
            period = 20
            scale = 2

            [indicators.trend]
            kind = "macd"
            fast = 12
            slow = 26
            signal = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.indicators.len(), 3);
        assert_eq!(config.indicators["fast"], IndicatorSpec::Ema { period: 12 });
        assert_eq!(
            config.indicators["bands"],
            IndicatorSpec::Bbands {
                period: 20,
                scale: dec!(2)
            }
        );
    }

    #[test]
    fn missing_indicators_table_is_empty() {
        let config = RillConfig::from_toml_str("").unwrap();
        assert!(config.indicators.is_empty());
        assert!(config.preset().unwrap().is_empty());
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        let err = RillConfig::from_toml_str(
            r#"
            [indicators.mystery]
            kind = "kama"
            period = 10
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("kama"));
    }

    #[test]
    fn preset_reports_the_invalid_entry() {
        let config = RillConfig::from_toml_str(
            r#"
            [indicators.broken]
            kind = "sma"
            period = 0
            "#,
        )
        .unwrap();
        let err = config.preset().unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("broken"));
        assert!(message.contains("sma"));
    }
}
