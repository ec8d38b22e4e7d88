#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Facade over the rill crates.

use std::path::Path;

use anyhow::Result;

/// Configuration loading.
pub use rill_config as config;
/// Candle model and the `Input` trait.
pub use rill_core as core;
/// The combinator engine.
pub use rill_flow as flow;
/// Indicator library and presets.
pub use rill_indicators as indicators;

/// Traits and constructors needed by most users.
pub mod prelude {
    pub use rill_config::{load_config, RillConfig};
    pub use rill_core::{Candle, Input};
    pub use rill_flow::{fork, map, pipe, BoxTransformer, Pipeline, Transformer};
    pub use rill_indicators::{Indicator, IndicatorError, IndicatorSpec, IndicatorValue, Preset};
}

/// Loads a configuration file and returns its validated preset.
pub fn load_preset(path: impl AsRef<Path>) -> Result<rill_indicators::Preset> {
    rill_config::load_config(path)?.preset()
}
