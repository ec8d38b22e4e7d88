//! Aroon indicator and oscillator.

use rill_core::Candle;
use rill_flow::{fork, map, Transformer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{decimal_from_usize, ensure_period, Indicator, IndicatorError};
use crate::math;
use crate::price::{high, low};

/// Aroon down/up pair, each between 0 and 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AroonOutput {
    /// How recently the lowest low occurred.
    pub down: Decimal,
    /// How recently the highest high occurred.
    pub up: Decimal,
}

fn scale(period: usize) -> impl FnMut(usize) -> Decimal + Clone {
    let factor = Decimal::ONE_HUNDRED / decimal_from_usize(period);
    move |distance: usize| factor * decimal_from_usize(period - distance)
}

fn aroon_up(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    Ok(rill_flow::pipe!(
        high(),
        math::max_distance(period + 1)?,
        map(scale(period)),
    ))
}

fn aroon_down(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    Ok(rill_flow::pipe!(
        low(),
        math::min_distance(period + 1)?,
        map(scale(period)),
    ))
}

/// Aroon over `period + 1` candles. Lookback `period`.
pub fn aroon(
    period: usize,
) -> Result<impl Transformer<Input = Candle, Output = AroonOutput> + Clone, IndicatorError> {
    let period = ensure_period("Aroon", period)?;
    Ok(rill_flow::pipe!(
        fork((aroon_down(period)?, aroon_up(period)?)),
        map(|(down, up): (Decimal, Decimal)| AroonOutput { down, up }),
    ))
}

/// `aroon up - aroon down`. Lookback `period`.
pub fn aroonosc(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    let period = ensure_period("AroonOsc", period)?;
    Ok(math::minus(aroon_up(period)?, aroon_down(period)?))
}
