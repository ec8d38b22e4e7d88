//! True range and Average True Range (ATR).

use rill_core::Candle;
use rill_flow::{map, pipe, scan};
use rust_decimal::Decimal;

use crate::core::{ensure_period, Indicator, IndicatorError};
use crate::indicators::wilders;
use crate::math;
use crate::price::close;

/// Largest of `high - low`, `|high - previous close|` and `|low - previous close|`.
/// The first candle uses `high - low`. Lookback 0.
pub fn tr() -> impl Indicator<Candle> {
    pipe(
        scan(
            |state: &(Decimal, Option<Decimal>), candle: Candle, _| {
                let range = candle.range();
                let value = match state.1 {
                    Some(previous) => range
                        .max((candle.high - previous).abs())
                        .max((candle.low - previous).abs()),
                    None => range,
                };
                (value, Some(candle.close))
            },
            (Decimal::ZERO, None),
        ),
        map(|(value, _): (Decimal, Option<Decimal>)| value),
    )
}

/// Wilder-smoothed true range. Lookback `period - 1`.
pub fn atr(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    let period = ensure_period("ATR", period)?;
    Ok(pipe(tr(), wilders::smooth(period)?))
}

/// ATR as a percentage of the close. Lookback `period - 1`.
pub fn natr(period: usize) -> Result<impl Indicator<Candle>, IndicatorError> {
    Ok(math::ratio(atr(period)?, close(), Decimal::ONE_HUNDRED))
}
