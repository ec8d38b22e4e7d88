#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Streaming technical indicators over decimal prices and OHLCV candles.

/// Indicator trait, validation helpers and errors.
pub mod core;
/// Built-in indicator implementations.
pub mod indicators;
/// Arithmetic and windowing building blocks shared by the indicators.
pub mod math;
/// Serializable indicator descriptions and keyed indicator sets.
pub mod preset;
/// Candle field extractors.
pub mod price;

/// Re-export of the indicator trait and its error type.
pub use crate::core::{Indicator, IndicatorError, Input};
/// Re-export of the runtime indicator descriptions.
pub use crate::preset::{DynIndicator, IndicatorSpec, IndicatorValue, Preset};
/// Re-export of the candle type consumed by OHLCV indicators.
pub use rill_core::Candle;
