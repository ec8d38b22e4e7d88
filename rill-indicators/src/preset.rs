//! Declarative indicator descriptions and keyed indicator sets.

use std::collections::BTreeMap;

use rill_core::Candle;
use rill_flow::{map, map_fork, BoxTransformer, Fork, Transformer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::IndicatorError;
use crate::indicators::{self, AroonOutput, BollingerBandsOutput, MacdOutput, StochOutput};
use crate::price;

/// Output of an indicator whose concrete type has been erased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    /// Single-line indicators.
    Scalar(Decimal),
    /// Multi-line indicators, in the order documented on each [`IndicatorSpec`] variant.
    Multi(Vec<Decimal>),
}

impl IndicatorValue {
    /// Returns the value of a single-line indicator.
    pub fn as_scalar(&self) -> Option<Decimal> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Multi(_) => None,
        }
    }

    /// Returns every line of the value.
    pub fn lines(&self) -> &[Decimal] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Multi(values) => values,
        }
    }
}

impl From<Decimal> for IndicatorValue {
    fn from(value: Decimal) -> Self {
        Self::Scalar(value)
    }
}

impl From<BollingerBandsOutput> for IndicatorValue {
    fn from(value: BollingerBandsOutput) -> Self {
        Self::Multi(vec![value.lower, value.middle, value.upper])
    }
}

impl From<MacdOutput> for IndicatorValue {
    fn from(value: MacdOutput) -> Self {
        Self::Multi(vec![value.macd, value.signal, value.histogram])
    }
}

impl From<AroonOutput> for IndicatorValue {
    fn from(value: AroonOutput) -> Self {
        Self::Multi(vec![value.down, value.up])
    }
}

impl From<StochOutput> for IndicatorValue {
    fn from(value: StochOutput) -> Self {
        Self::Multi(vec![value.k, value.d])
    }
}

/// Boxed candle-to-value transformer produced by [`IndicatorSpec::build`].
pub type DynIndicator = BoxTransformer<Candle, IndicatorValue>;

/// Serializable description of one indicator over candles.
///
/// Scalar indicators read the candle close. Deserializes from a table tagged by
/// `kind`, for example `{ kind = "sma", period = 14 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndicatorSpec {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
    /// Traded volume.
    Volume,
    /// High minus low.
    Range,
    /// Average of open, high, low and close.
    AvgPrice,
    /// Midpoint of high and low.
    MedPrice,
    /// Average of high, low and close.
    TypPrice,
    /// Weighted close.
    WcPrice,
    /// Simple moving average.
    Sma {
        /// Window length.
        period: usize,
    },
    /// Exponential moving average.
    Ema {
        /// Period used to derive the smoothing factor.
        period: usize,
    },
    /// Double exponential moving average.
    Dema {
        /// Period used to derive the smoothing factor.
        period: usize,
    },
    /// Triple exponential moving average.
    Tema {
        /// Period used to derive the smoothing factor.
        period: usize,
    },
    /// Rate of change of the triple EMA.
    Trix {
        /// Period used to derive the smoothing factor.
        period: usize,
    },
    /// Wilder's smoothing.
    Wilders {
        /// Window length.
        period: usize,
    },
    /// Weighted moving average.
    Wma {
        /// Window length.
        period: usize,
    },
    /// Hull moving average.
    Hma {
        /// Window length, at least 2.
        period: usize,
    },
    /// Rolling population variance.
    Variance {
        /// Window length.
        period: usize,
    },
    /// Rolling population standard deviation.
    Stddev {
        /// Window length.
        period: usize,
    },
    /// Bollinger Bands as `[lower, middle, upper]`.
    Bbands {
        /// Window length.
        period: usize,
        /// Standard deviations between the middle and outer bands.
        scale: Decimal,
    },
    /// Relative strength index.
    Rsi {
        /// Smoothing period.
        period: usize,
    },
    /// Chande momentum oscillator.
    Cmo {
        /// Window length.
        period: usize,
    },
    /// MACD as `[macd, signal, histogram]`.
    Macd {
        /// Fast EMA period.
        fast: usize,
        /// Slow EMA period.
        slow: usize,
        /// Signal EMA period.
        signal: usize,
    },
    /// Absolute price oscillator.
    Apo {
        /// Fast EMA period.
        fast: usize,
        /// Slow EMA period.
        slow: usize,
    },
    /// Percentage price oscillator.
    Ppo {
        /// Fast EMA period.
        fast: usize,
        /// Slow EMA period.
        slow: usize,
    },
    /// Momentum.
    Mom {
        /// Lag in ticks.
        period: usize,
    },
    /// Rate of change.
    Roc {
        /// Lag in ticks.
        period: usize,
    },
    /// Rate of change ratio.
    Rocr {
        /// Lag in ticks.
        period: usize,
    },
    /// True range.
    Tr,
    /// Average true range.
    Atr {
        /// Smoothing period.
        period: usize,
    },
    /// Normalized average true range.
    Natr {
        /// Smoothing period.
        period: usize,
    },
    /// Aroon as `[down, up]`.
    Aroon {
        /// Look-back window.
        period: usize,
    },
    /// Aroon oscillator.
    AroonOsc {
        /// Look-back window.
        period: usize,
    },
    /// Stochastic oscillator as `[k, d]`.
    Stoch {
        /// Range window for raw %K.
        k_period: usize,
        /// SMA smoothing of %K.
        k_slowing: usize,
        /// SMA period of %D.
        d_period: usize,
    },
    /// Williams %R.
    Willr {
        /// Range window.
        period: usize,
    },
    /// On-balance volume.
    Obv,
    /// Accumulation/distribution line.
    Ad,
    /// Chaikin oscillator.
    Adosc {
        /// Fast EMA period.
        short: usize,
        /// Slow EMA period.
        long: usize,
    },
    /// Volume-weighted moving average.
    Vwma {
        /// Window length.
        period: usize,
    },
}

fn erase<T>(transformer: T) -> DynIndicator
where
    T: Transformer<Input = Candle> + Clone + 'static,
    T::Output: Into<IndicatorValue> + 'static,
    T::Pipeline: 'static,
{
    transformer
        .pipe(map(<T::Output as Into<IndicatorValue>>::into))
        .boxed()
}

impl IndicatorSpec {
    /// Short lowercase name of the indicator kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Range => "range",
            Self::AvgPrice => "avgprice",
            Self::MedPrice => "medprice",
            Self::TypPrice => "typprice",
            Self::WcPrice => "wcprice",
            Self::Sma { .. } => "sma",
            Self::Ema { .. } => "ema",
            Self::Dema { .. } => "dema",
            Self::Tema { .. } => "tema",
            Self::Trix { .. } => "trix",
            Self::Wilders { .. } => "wilders",
            Self::Wma { .. } => "wma",
            Self::Hma { .. } => "hma",
            Self::Variance { .. } => "variance",
            Self::Stddev { .. } => "stddev",
            Self::Bbands { .. } => "bbands",
            Self::Rsi { .. } => "rsi",
            Self::Cmo { .. } => "cmo",
            Self::Macd { .. } => "macd",
            Self::Apo { .. } => "apo",
            Self::Ppo { .. } => "ppo",
            Self::Mom { .. } => "mom",
            Self::Roc { .. } => "roc",
            Self::Rocr { .. } => "rocr",
            Self::Tr => "tr",
            Self::Atr { .. } => "atr",
            Self::Natr { .. } => "natr",
            Self::Aroon { .. } => "aroon",
            Self::AroonOsc { .. } => "aroonosc",
            Self::Stoch { .. } => "stoch",
            Self::Willr { .. } => "willr",
            Self::Obv => "obv",
            Self::Ad => "ad",
            Self::Adosc { .. } => "adosc",
            Self::Vwma { .. } => "vwma",
        }
    }

    /// Builds a boxed transformer over candles.
    pub fn build(&self) -> Result<DynIndicator, IndicatorError> {
        let built = match *self {
            Self::Open => erase(price::open()),
            Self::High => erase(price::high()),
            Self::Low => erase(price::low()),
            Self::Close => erase(price::close()),
            Self::Volume => erase(price::volume()),
            Self::Range => erase(price::range()),
            Self::AvgPrice => erase(price::avgprice()),
            Self::MedPrice => erase(price::medprice()),
            Self::TypPrice => erase(price::typprice()),
            Self::WcPrice => erase(price::wcprice()),
            Self::Sma { period } => erase(indicators::sma::<Candle>(period)?),
            Self::Ema { period } => erase(indicators::ema::<Candle>(period)?),
            Self::Dema { period } => erase(indicators::dema::<Candle>(period)?),
            Self::Tema { period } => erase(indicators::tema::<Candle>(period)?),
            Self::Trix { period } => erase(indicators::trix::<Candle>(period)?),
            Self::Wilders { period } => erase(indicators::wilders::<Candle>(period)?),
            Self::Wma { period } => erase(indicators::wma::<Candle>(period)?),
            Self::Hma { period } => erase(indicators::hma::<Candle>(period)?),
            Self::Variance { period } => erase(indicators::variance::<Candle>(period)?),
            Self::Stddev { period } => erase(indicators::stddev::<Candle>(period)?),
            Self::Bbands { period, scale } => erase(indicators::bbands::<Candle>(period, scale)?),
            Self::Rsi { period } => erase(indicators::rsi::<Candle>(period)?),
            Self::Cmo { period } => erase(indicators::cmo::<Candle>(period)?),
            Self::Macd { fast, slow, signal } => {
                erase(indicators::macd::<Candle>(fast, slow, signal)?)
            }
            Self::Apo { fast, slow } => erase(indicators::apo::<Candle>(fast, slow)?),
            Self::Ppo { fast, slow } => erase(indicators::ppo::<Candle>(fast, slow)?),
            Self::Mom { period } => erase(indicators::mom::<Candle>(period)?),
            Self::Roc { period } => erase(indicators::roc::<Candle>(period)?),
            Self::Rocr { period } => erase(indicators::rocr::<Candle>(period)?),
            Self::Tr => erase(indicators::tr()),
            Self::Atr { period } => erase(indicators::atr(period)?),
            Self::Natr { period } => erase(indicators::natr(period)?),
            Self::Aroon { period } => erase(indicators::aroon(period)?),
            Self::AroonOsc { period } => erase(indicators::aroonosc(period)?),
            Self::Stoch {
                k_period,
                k_slowing,
                d_period,
            } => erase(indicators::stoch(k_period, k_slowing, d_period)?),
            Self::Willr { period } => erase(indicators::willr(period)?),
            Self::Obv => erase(indicators::obv()),
            Self::Ad => erase(indicators::ad()),
            Self::Adosc { short, long } => erase(indicators::adosc(short, long)?),
            Self::Vwma { period } => erase(indicators::vwma(period)?),
        };
        Ok(built)
    }
}

/// A keyed set of indicators evaluated together over one candle stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Indicator descriptions by output name.
    #[serde(default)]
    pub indicators: BTreeMap<String, IndicatorSpec>,
}

impl Preset {
    /// Creates an empty preset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an indicator and returns the preset.
    pub fn with(mut self, name: impl Into<String>, spec: IndicatorSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Adds an indicator, returning the description previously stored under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        spec: IndicatorSpec,
    ) -> Option<IndicatorSpec> {
        self.indicators.insert(name.into(), spec)
    }

    /// Number of indicators in the preset.
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    /// Returns `true` when the preset holds no indicators.
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Builds one synchronized transformer emitting every indicator per candle.
    ///
    /// The first output appears once the slowest indicator has warmed up; from then
    /// on each candle yields a map with one value per indicator name.
    pub fn transformer(&self) -> Result<Fork<BTreeMap<String, DynIndicator>>, IndicatorError> {
        if self.indicators.is_empty() {
            return Err(IndicatorError::EmptyPreset);
        }
        let mut branches = Vec::with_capacity(self.indicators.len());
        for (name, spec) in &self.indicators {
            let built = spec.build()?;
            debug!(
                name = name.as_str(),
                kind = spec.kind(),
                lookback = built.lookback(),
                "built indicator"
            );
            branches.push((name.clone(), built));
        }
        Ok(map_fork(branches))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn candles(closes: &[i64]) -> Vec<Candle> {
        closes
            .iter()
            .map(|close| {
                let close = Decimal::from(*close);
                Candle::new(close, close + dec!(1), close - dec!(1), close, dec!(10))
            })
            .collect()
    }

    #[test]
    fn deserializes_tagged_specs() {
        let spec: IndicatorSpec =
            serde_json::from_str(r#"{"kind":"bbands","period":20,"scale":"2"}"#).unwrap();
        assert_eq!(
            spec,
            IndicatorSpec::Bbands {
                period: 20,
                scale: dec!(2)
            }
        );
        let spec: IndicatorSpec =
            serde_json::from_str(r#"{"kind":"aroonosc","period":14}"#).unwrap();
        assert_eq!(spec.kind(), "aroonosc");
        let spec: IndicatorSpec = serde_json::from_str(r#"{"kind":"obv"}"#).unwrap();
        assert_eq!(spec, IndicatorSpec::Obv);
    }

    #[test]
    fn build_reports_invalid_parameters() {
        assert!(matches!(
            IndicatorSpec::Sma { period: 0 }.build().err(),
            Some(IndicatorError::InvalidPeriod { name: "SMA", .. })
        ));
        assert!(IndicatorSpec::Hma { period: 1 }.build().is_err());
    }

    #[test]
    fn built_indicators_keep_their_lookback() {
        let sma = IndicatorSpec::Sma { period: 3 }.build().unwrap();
        assert_eq!(sma.lookback(), 2);
        assert_eq!(
            sma.run(candles(&[1, 2, 3, 4])),
            vec![IndicatorValue::Scalar(dec!(2)), IndicatorValue::Scalar(dec!(3))]
        );
        let macd = IndicatorSpec::Macd {
            fast: 3,
            slow: 7,
            signal: 3,
        }
        .build()
        .unwrap();
        assert_eq!(macd.lookback(), 6);
        let outputs = macd.run(candles(&[2; 7]));
        assert_eq!(outputs[0].lines(), &[Decimal::ZERO; 3][..]);
    }

    #[test]
    fn preset_synchronizes_every_indicator() {
        let preset = Preset::new()
            .with("close", IndicatorSpec::Close)
            .with("slow", IndicatorSpec::Sma { period: 3 })
            .with("momentum", IndicatorSpec::Mom { period: 1 });
        let outputs = preset.transformer().unwrap().run(candles(&[1, 2, 3, 4]));
        assert_eq!(outputs.len(), 2);
        let first = &outputs[0];
        assert_eq!(first["close"].as_scalar(), Some(dec!(3)));
        assert_eq!(first["slow"].as_scalar(), Some(dec!(2)));
        assert_eq!(first["momentum"].as_scalar(), Some(dec!(1)));
        assert_eq!(outputs[1]["close"].as_scalar(), Some(dec!(4)));
    }

    #[test]
    fn empty_preset_is_rejected() {
        assert!(matches!(
            Preset::new().transformer().err(),
            Some(IndicatorError::EmptyPreset)
        ));
    }
}
