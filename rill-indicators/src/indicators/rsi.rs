//! Relative Strength Index (RSI) and Chande Momentum Oscillator (CMO).

use rill_flow::{map_with_last, pipe};
use rust_decimal::Decimal;

use crate::core::{ensure_period, Indicator, IndicatorError, Input};
use crate::indicators::wilders;
use crate::math;
use crate::price::value;

/// Upward moves between consecutive inputs. Lookback 1.
fn gains() -> impl Indicator<Decimal> {
    map_with_last(|input: &Decimal, last: &Decimal| {
        if input > last {
            input - last
        } else {
            Decimal::ZERO
        }
    })
}

/// Downward moves between consecutive inputs, as positive amounts. Lookback 1.
fn losses() -> impl Indicator<Decimal> {
    map_with_last(|input: &Decimal, last: &Decimal| {
        if input < last {
            last - input
        } else {
            Decimal::ZERO
        }
    })
}

/// Wilder's RSI scaled between 0 and 100: `100 * gain / (gain + loss)` of the
/// smoothed gains and losses. A series without any movement yields 0.
/// Lookback `period`.
pub fn rsi<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("RSI", period)?;
    Ok(pipe(
        value::<I>(),
        math::short_over_sum(
            pipe(gains(), wilders::smooth(period)?),
            pipe(losses(), wilders::smooth(period)?),
        ),
    ))
}

/// Chande Momentum Oscillator: `100 * (gains - losses) / (gains + losses)` over
/// rolling sums. Lookback `period`.
pub fn cmo<I: Input>(period: usize) -> Result<impl Indicator<I>, IndicatorError> {
    let period = ensure_period("CMO", period)?;
    Ok(pipe(
        value::<I>(),
        math::diff_over_sum(
            pipe(gains(), math::sum(period)?),
            pipe(losses(), math::sum(period)?),
        ),
    ))
}
