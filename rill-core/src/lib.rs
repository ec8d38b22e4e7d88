#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//! Sample types consumed by indicator pipelines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLCV sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Opening price.
    pub open: Decimal,
    /// Highest traded price.
    pub high: Decimal,
    /// Lowest traded price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Traded volume.
    #[serde(default)]
    pub volume: Decimal,
}

impl Candle {
    /// Creates a candle from its OHLCV components.
    pub fn new(
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Candle whose four prices all equal `price`, with zero volume.
    pub fn flat(price: Decimal) -> Self {
        Self::new(price, price, price, price, Decimal::ZERO)
    }

    /// `high - low`.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Mean of open, high, low and close.
    pub fn average_price(&self) -> Decimal {
        (self.open + self.high + self.low + self.close) / Decimal::from(4)
    }

    /// Midpoint of high and low.
    pub fn median_price(&self) -> Decimal {
        (self.high + self.low) / Decimal::TWO
    }

    /// Mean of high, low and close.
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }

    /// `(high + low + 2 * close) / 4`.
    pub fn weighted_close(&self) -> Decimal {
        (self.high + self.low + self.close * Decimal::TWO) / Decimal::from(4)
    }
}

/// Values that scalar indicators can consume.
pub trait Input: Clone {
    /// Price the indicator should use for this sample.
    fn value(&self) -> Decimal;
}

impl Input for Decimal {
    fn value(&self) -> Decimal {
        *self
    }
}

impl Input for Candle {
    fn value(&self) -> Decimal {
        self.close
    }
}
