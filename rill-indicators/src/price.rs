//! Field extractors and derived prices for candle streams.

use rill_core::Candle;
use rill_flow::map;
use rust_decimal::Decimal;

use crate::core::{Indicator, Input};

/// Opening price of each candle.
pub fn open() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.open)
}

/// Highest price of each candle.
pub fn high() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.high)
}

/// Lowest price of each candle.
pub fn low() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.low)
}

/// Closing price of each candle.
pub fn close() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.close)
}

/// Traded volume of each candle.
pub fn volume() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.volume)
}

/// Volume floored at a tiny positive amount so it can divide safely.
pub(crate) fn nonzero_volume() -> impl Indicator<Candle> {
    map(|candle: Candle| {
        if candle.volume > Decimal::ZERO {
            candle.volume
        } else {
            Decimal::new(1, 8)
        }
    })
}

/// `high - low`.
pub fn range() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.range())
}

/// Average of open, high, low and close.
pub fn avgprice() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.average_price())
}

/// Midpoint of high and low.
pub fn medprice() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.median_price())
}

/// Average of high, low and close.
pub fn typprice() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.typical_price())
}

/// Weighted close: `(high + low + 2 * close) / 4`.
pub fn wcprice() -> impl Indicator<Candle> {
    map(|candle: Candle| candle.weighted_close())
}

/// Extracts the indicator value of any [`Input`]; the close for candles.
pub fn value<I: Input>() -> impl Indicator<I> {
    map(|input: I| input.value())
}
